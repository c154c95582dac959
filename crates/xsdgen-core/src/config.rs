//! Configuration schema (xsdgen.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How include names are compared against type names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameComparison {
    /// Exact, case-sensitive comparison
    #[default]
    Ordinal,

    /// Case-insensitive comparison
    IgnoreCase,
}

impl NameComparison {
    /// Compare two names
    pub fn equals(&self, a: &str, b: &str) -> bool {
        match self {
            Self::Ordinal => a == b,
            Self::IgnoreCase => a.to_lowercase() == b.to_lowercase(),
        }
    }

    /// Check whether `text` starts with `prefix`
    pub fn starts_with(&self, text: &str, prefix: &str) -> bool {
        match self {
            Self::Ordinal => text.starts_with(prefix),
            Self::IgnoreCase => text.to_lowercase().starts_with(&prefix.to_lowercase()),
        }
    }
}

/// Text encoding of written schema files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputEncoding {
    /// UTF-8 preceded by a byte-order mark
    #[default]
    #[serde(rename = "utf-8-bom")]
    Utf8Bom,

    /// UTF-8 without byte-order mark
    #[serde(rename = "utf-8")]
    Utf8,

    /// UTF-16 little endian with byte-order mark
    #[serde(rename = "utf-16le")]
    Utf16Le,

    /// UTF-16 big endian with byte-order mark
    #[serde(rename = "utf-16be")]
    Utf16Be,
}

impl OutputEncoding {
    /// Name used in the XML declaration
    pub fn xml_name(&self) -> &'static str {
        match self {
            Self::Utf8Bom | Self::Utf8 => "utf-8",
            Self::Utf16Le | Self::Utf16Be => "utf-16",
        }
    }
}

impl std::fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8Bom => write!(f, "utf-8-bom"),
            Self::Utf8 => write!(f, "utf-8"),
            Self::Utf16Le => write!(f, "utf-16le"),
            Self::Utf16Be => write!(f, "utf-16be"),
        }
    }
}

impl std::str::FromStr for OutputEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8-bom" | "utf8-bom" => Ok(Self::Utf8Bom),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16le" | "utf-16" | "utf16" => Ok(Self::Utf16Le),
            "utf-16be" => Ok(Self::Utf16Be),
            _ => Err(ConfigError::ParseError(format!("unknown encoding '{}'", s))),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["dll".to_string(), "exe".to_string(), "json".to_string()]
}

/// Exporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Comparison used when matching include names
    #[serde(default)]
    pub type_name_comparison: NameComparison,

    /// Suppress validation diagnostics entirely (errors included)
    #[serde(default)]
    pub skip_validation: bool,

    /// Run the full compile pass instead of import resolution only
    #[serde(default)]
    pub full_compile: bool,

    /// Directory the schema files are written to
    #[serde(default)]
    pub output_directory: PathBuf,

    /// Encoding of the schema files
    #[serde(default)]
    pub output_encoding: OutputEncoding,

    /// Target namespace for types without one
    #[serde(default)]
    pub default_namespace: Option<String>,

    /// File extensions accepted as module paths (without dot)
    #[serde(default = "default_extensions")]
    pub module_extensions: Vec<String>,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            type_name_comparison: NameComparison::default(),
            skip_validation: false,
            full_compile: false,
            output_directory: std::env::current_dir().unwrap_or_default(),
            output_encoding: OutputEncoding::default(),
            default_namespace: None,
            module_extensions: default_extensions(),
        }
    }
}

impl ExporterConfig {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Relative output directories are resolved against the config file
        if config.output_directory.is_relative() {
            if let Some(parent) = path.parent() {
                config.output_directory = parent.join(&config.output_directory);
            }
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Whether the path carries one of the accepted module extensions
    pub fn is_module_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.module_extensions
                    .iter()
                    .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = ExporterConfig::default();
        assert_eq!(config.type_name_comparison, NameComparison::Ordinal);
        assert_eq!(config.output_encoding, OutputEncoding::Utf8Bom);
        assert!(!config.skip_validation);
        assert!(!config.full_compile);
    }

    #[test]
    fn name_comparison() {
        assert!(NameComparison::Ordinal.equals("Foo.Bar", "Foo.Bar"));
        assert!(!NameComparison::Ordinal.equals("foo.bar", "Foo.Bar"));
        assert!(NameComparison::IgnoreCase.equals("foo.bar", "Foo.Bar"));
        assert!(NameComparison::IgnoreCase.starts_with("Foo.Bar", "foo."));
        assert!(!NameComparison::Ordinal.starts_with("Foo.Bar", "foo."));
    }

    #[test]
    fn partial_toml() {
        let config = ExporterConfig::from_toml(
            r#"
            skip_validation = true
            type_name_comparison = "ignore-case"
            output_encoding = "utf-16be"
            "#,
        )
        .unwrap();

        assert!(config.skip_validation);
        assert_eq!(config.type_name_comparison, NameComparison::IgnoreCase);
        assert_eq!(config.output_encoding, OutputEncoding::Utf16Be);
        assert_eq!(config.module_extensions, default_extensions());
    }

    #[test]
    fn invalid_toml() {
        assert!(matches!(
            ExporterConfig::from_toml("output_encoding = \"latin1\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = ExporterConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed = ExporterConfig::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn module_extensions() {
        let config = ExporterConfig::default();
        assert!(config.is_module_path(Path::new("bin/Contoso.Models.dll")));
        assert!(config.is_module_path(Path::new("Tool.EXE")));
        assert!(config.is_module_path(Path::new("models.json")));
        assert!(!config.is_module_path(Path::new("readme.md")));
        assert!(!config.is_module_path(Path::new("noext")));
    }

    #[test]
    fn encoding_from_str() {
        assert_eq!("UTF-8".parse::<OutputEncoding>().unwrap(), OutputEncoding::Utf8);
        assert_eq!("utf-16".parse::<OutputEncoding>().unwrap(), OutputEncoding::Utf16Le);
        assert!("ascii".parse::<OutputEncoding>().is_err());
    }
}

//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;
use xsdgen_core::{ExporterConfig, NameComparison, OutputEncoding};

/// xsdgen - Export XML schemas for the types of compiled modules
#[derive(Parser, Debug)]
#[command(name = "xsdgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Modules whose types are exported (e.g., Contoso.Models.dll)
    #[arg(value_name = "MODULE")]
    pub modules: Vec<PathBuf>,

    /// Types to export, separated by ',' or ';'. Full names, simple names
    /// and namespace wildcards such as `Contoso.Models.*` are accepted
    #[arg(short = 't', long = "type", value_name = "TYPES")]
    pub types: Vec<String>,

    /// Directory the schema files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Do not report schema validation diagnostics
    #[arg(long)]
    pub skip_validation: bool,

    /// Path to config file (default: xsdgen.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run structural checks in addition to import resolution
    #[arg(long)]
    pub full_compile: bool,

    /// Match type names case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    /// Encoding of the schema files (utf-8-bom, utf-8, utf-16le, utf-16be)
    #[arg(long)]
    pub encoding: Option<OutputEncoding>,

    /// Also write a JSON export report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Include names from all `--type` values
    pub fn include_names(&self) -> Vec<String> {
        split_type_names(&self.types)
    }

    /// Apply command-line overrides on top of the file configuration
    pub fn apply_to(&self, config: &mut ExporterConfig) {
        if let Some(output) = &self.output {
            config.output_directory = output.clone();
        }
        if let Some(encoding) = self.encoding {
            config.output_encoding = encoding;
        }
        if self.skip_validation {
            config.skip_validation = true;
        }
        if self.full_compile {
            config.full_compile = true;
        }
        if self.ignore_case {
            config.type_name_comparison = NameComparison::IgnoreCase;
        }
    }
}

/// Split `--type` values on ',' and ';', trimming and dropping empty entries
pub fn split_type_names(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split([',', ';']))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

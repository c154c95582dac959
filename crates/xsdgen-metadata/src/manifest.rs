//! JSON module manifests
//!
//! A module manifest lists the public surface of a compiled module as JSON.
//! The manifest is read from the module path itself, so a module can be
//! named after the binary it describes (e.g., `Contoso.Models.dll`).

use serde::{Deserialize, Serialize};
use std::path::Path;
use xsdgen_core::TypeDescriptor;
use crate::provider::{ModuleTypes, ProviderError, TypeMetadataProvider};

/// Module manifest structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name; defaults to the file stem
    #[serde(default)]
    pub module: Option<String>,

    /// Declared types
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl ModuleManifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        if !path.exists() {
            return Err(ProviderError::NotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
            .map_err(|e| match e {
                ProviderError::InvalidMetadata(_, reason) => {
                    ProviderError::InvalidMetadata(path.display().to_string(), reason)
                }
                other => other,
            })
    }

    /// Parse manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json)
            .map_err(|e| ProviderError::InvalidMetadata("<inline>".to_string(), e.to_string()))
    }

    /// Convert into the module's type list
    pub fn into_module(self, fallback_name: &str) -> ModuleTypes {
        let name = self.module.unwrap_or_else(|| fallback_name.to_string());
        let types = self.types.into_iter().map(TypeDescriptor::normalized).collect();

        ModuleTypes { name, types }
    }
}

/// Provider reading JSON module manifests from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestProvider;

impl ManifestProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TypeMetadataProvider for ManifestProvider {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn load_module(&self, path: &Path) -> Result<ModuleTypes, ProviderError> {
        let manifest = ModuleManifest::from_file(path)?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let module = manifest.into_module(stem);
        tracing::debug!(module = %module.name, types = module.types.len(), "loaded module manifest");

        Ok(module)
    }
}

//! Provider trait for loading module type metadata

use std::collections::HashMap;
use std::path::Path;
use xsdgen_core::TypeDescriptor;

/// Errors that can occur when loading a module
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Module not found: {0}")]
    NotFound(String),

    #[error("Failed to read module {0}: {1}")]
    IoError(String, String),

    #[error("Invalid module metadata in {0}: {1}")]
    InvalidMetadata(String, String),

    #[error("{0}")]
    Other(String),
}

/// Types declared by one loaded module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleTypes {
    /// Module name (e.g., "Contoso.Models")
    pub name: String,

    /// Declared types in declaration order
    pub types: Vec<TypeDescriptor>,
}

impl ModuleTypes {
    pub fn new(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }

    /// Lookup table over the declared types
    pub fn index(&self) -> TypeIndex {
        TypeIndex::from_types(&self.types)
    }
}

/// Lookup of declared types by full name
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index; on duplicate names the first declaration wins
    pub fn from_types(types: &[TypeDescriptor]) -> Self {
        let mut index = Self::new();
        for ty in types {
            index.types.entry(ty.full_name.clone()).or_insert_with(|| ty.clone());
        }
        index
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(full_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Trait for loading the type declarations of a module
pub trait TypeMetadataProvider {
    /// Get the provider name (e.g., "manifest")
    fn name(&self) -> &'static str;

    /// Load the module at `path` and list its types
    fn load_module(&self, path: &Path) -> Result<ModuleTypes, ProviderError>;
}

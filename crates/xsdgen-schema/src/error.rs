//! Schema error types

use std::path::PathBuf;

/// Errors raised while mapping a type into a schema
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error(
        "Types '{existing}' and '{duplicate}' both use the XML type name '{name}' in namespace '{namespace}'. \
         Use an explicit type name to distinguish them."
    )]
    DuplicateTypeName {
        name: String,
        namespace: String,
        existing: String,
        duplicate: String,
    },

    #[error("Type '{0}' cannot be mapped: {1}")]
    Unsupported(String, String),
}

/// Errors raised while writing a schema file
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

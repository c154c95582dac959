//! In-memory provider for testing
//!
//! Returns predefined modules without touching the file system. Useful for
//! unit testing the export pipeline and for simulating load failures.
//!
//! ```rust,ignore
//! let provider = InMemoryProvider::new()
//!     .with_module("a.dll", ModuleTypes::new("A", vec![TypeDescriptor::new("A.X")]))
//!     .with_failure("broken.dll", "bad image format");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::provider::{ModuleTypes, ProviderError, TypeMetadataProvider};

/// In-memory module provider
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    /// Predefined modules by path
    modules: HashMap<PathBuf, ModuleTypes>,

    /// Errors to return for specific paths
    failures: HashMap<PathBuf, String>,

    /// Paths requested so far
    requests: RefCell<Vec<PathBuf>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under a path
    pub fn with_module(mut self, path: impl Into<PathBuf>, module: ModuleTypes) -> Self {
        self.modules.insert(path.into(), module);
        self
    }

    /// Make loading a path fail with the given reason
    pub fn with_failure(mut self, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        self.failures.insert(path.into(), reason.into());
        self
    }

    /// Paths passed to `load_module`, in call order
    pub fn requests(&self) -> Vec<PathBuf> {
        self.requests.borrow().clone()
    }
}

impl TypeMetadataProvider for InMemoryProvider {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn load_module(&self, path: &Path) -> Result<ModuleTypes, ProviderError> {
        self.requests.borrow_mut().push(path.to_path_buf());

        if let Some(reason) = self.failures.get(path) {
            return Err(ProviderError::Other(reason.clone()));
        }

        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.display().to_string()))
    }
}

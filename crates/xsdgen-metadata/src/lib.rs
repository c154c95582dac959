//! Type metadata providers
//!
//! A provider loads a module and lists the type declarations it exposes.
//! The export pipeline only talks to the [`TypeMetadataProvider`] trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdgen_metadata::{ManifestProvider, TypeMetadataProvider};
//!
//! let provider = ManifestProvider::new();
//! let module = provider.load_module(Path::new("bin/Contoso.Models.json"))?;
//! for ty in &module.types {
//!     println!("{}", ty.full_name);
//! }
//! ```

pub mod provider;
pub mod manifest;
pub mod mock;

pub use provider::{TypeMetadataProvider, ModuleTypes, TypeIndex, ProviderError};
pub use manifest::{ManifestProvider, ModuleManifest};
pub use mock::InMemoryProvider;

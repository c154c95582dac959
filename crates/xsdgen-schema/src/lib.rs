//! xsdgen schema model
//!
//! Schema documents and the collaborators that produce them:
//! - Mapping of type descriptors into namespace-scoped schema documents
//! - Compilation (import consolidation and structural checks)
//! - Rendering and encoding of XSD text

pub mod document;
pub mod sink;
pub mod mapper;
pub mod compiler;
pub mod writer;
pub mod error;

pub use document::{
    SchemaDocument, SchemaItem, ComplexType, SimpleType, ElementParticle, AttributeDecl,
    GlobalElement, QualifiedName, XS_NAMESPACE, SUPPORT_NAMESPACE,
};
pub use sink::SchemaSink;
pub use mapper::{SchemaMapper, XmlTypeMapper};
pub use compiler::SchemaCompiler;
pub use writer::{SchemaWriter, position_of};
pub use error::{MappingError, WriteError};

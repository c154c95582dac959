//! xsdgen engine - schema export pipeline
//!
//! This crate implements the export pipeline:
//! - Selection of exportable types
//! - Mapping registry that tracks which type created which schema document
//! - Collection of schema validation diagnostics
//! - Export orchestration and output file naming

pub mod selector;
pub mod registry;
pub mod collector;
pub mod exporter;

pub use selector::TypeSelector;
pub use registry::SchemaMappingRegistry;
pub use collector::DiagnosticCollector;
pub use exporter::{SchemaExporter, ExportError, ExportPhase};

//! xsdgen Core
//!
//! Core domain model shared by every xsdgen crate: type descriptors,
//! validation diagnostics, the export result, configuration and the
//! logging sink.

pub mod types;
pub mod diagnostic;
pub mod report;
pub mod config;
pub mod log;

pub use types::{TypeDescriptor, TypeKind, MemberDescriptor, TypeRef, XsdPrimitive, XmlTypeOptions};
pub use diagnostic::{ValidationDiagnostic, DiagnosticSeverity, Position};
pub use report::{ExportResult, ExportedItem, ReportVersion, ReportSummary};
pub use config::{ExporterConfig, NameComparison, OutputEncoding, ConfigError};
pub use log::{LogSink, Priority, RecordingSink};

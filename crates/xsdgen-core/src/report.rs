//! Export result (report v1)
//!
//! Returned by every export run and optionally saved as JSON.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{DiagnosticSeverity, ValidationDiagnostic};
use crate::types::TypeDescriptor;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// A schema file written by the export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedItem {
    /// File name relative to the output directory
    pub filename: String,

    /// Type whose mapping created the schema, if known
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_descriptor: Option<TypeDescriptor>,

    /// Target namespace of the schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Hex SHA-256 of the bytes written
    pub sha256: String,

    /// Number of bytes written
    pub bytes: usize,
}

/// Summary statistics for a result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of validation diagnostics
    pub diagnostics: usize,

    /// Number of error-severity diagnostics
    pub errors: usize,

    /// Number of warning-severity diagnostics
    pub warnings: usize,

    /// Number of schema files written
    pub exported: usize,
}

/// Summary of one export operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    /// Schema version
    version: ReportVersion,

    /// Timestamp (ISO 8601)
    timestamp: String,

    /// Summary statistics
    summary: ReportSummary,

    validation_warnings: Vec<ValidationDiagnostic>,

    exported_schemas: Vec<ExportedItem>,
}

impl ExportResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            validation_warnings: Vec::new(),
            exported_schemas: Vec::new(),
        }
    }

    pub fn version(&self) -> ReportVersion {
        self.version
    }

    /// Creation time (RFC 3339)
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Counts kept in step with the recorded diagnostics and schemas
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    /// Whether any validation diagnostic was recorded, whatever its severity
    pub fn has_validation_warnings(&self) -> bool {
        !self.validation_warnings.is_empty()
    }

    /// All validation diagnostics, in the order they were received
    pub fn validation_warnings(&self) -> &[ValidationDiagnostic] {
        &self.validation_warnings
    }

    /// All written schemas, in creation order
    pub fn exported_schemas(&self) -> &[ExportedItem] {
        &self.exported_schemas
    }

    /// Record a validation diagnostic
    pub fn add_validation_warning(&mut self, diagnostic: ValidationDiagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error => self.summary.errors += 1,
            DiagnosticSeverity::Warning => self.summary.warnings += 1,
        }

        self.summary.diagnostics += 1;
        self.validation_warnings.push(diagnostic);
    }

    /// Record a written schema
    pub fn add_exported_schema(&mut self, item: ExportedItem) {
        self.summary.exported += 1;
        self.exported_schemas.push(item);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for ExportResult {
    fn default() -> Self {
        Self::new()
    }
}

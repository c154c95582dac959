//! Validation diagnostic collection

use xsdgen_core::{ExportResult, LogSink, Priority, ValidationDiagnostic};

/// Receives compile diagnostics and records them into the export result
///
/// Diagnostics are advisory: recording one never stops the export, whatever
/// its severity.
pub struct DiagnosticCollector<'a> {
    skip_validation: bool,
    sink: &'a dyn LogSink,
}

impl<'a> DiagnosticCollector<'a> {
    pub fn new(skip_validation: bool, sink: &'a dyn LogSink) -> Self {
        Self { skip_validation, sink }
    }

    /// Record and log one diagnostic; does nothing when validation is skipped
    pub fn on_diagnostic(&self, result: &mut ExportResult, diagnostic: ValidationDiagnostic) {
        if self.skip_validation {
            return;
        }

        let priority = if diagnostic.is_error() {
            Priority::Error
        } else {
            Priority::Warning
        };

        let message = match diagnostic.position {
            Some(position) => format!(
                "Schema validation {} at ({}, {}): {}",
                priority, position.line, position.column, diagnostic.message
            ),
            None => format!("Schema validation {}: {}", priority, diagnostic.message),
        };

        self.sink.write_line(priority, &message);
        result.add_validation_warning(diagnostic);
    }
}

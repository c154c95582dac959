//! Validation diagnostics
//!
//! Structural issues found while compiling schema documents. Diagnostics
//! are collected into the export result; they never abort an export, not
//! even at error severity.

use serde::{Deserialize, Serialize};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Questionable but consistent schema content
    Warning,

    /// Inconsistent schema content (e.g., unresolved type reference)
    Error,
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position in a rendered schema document (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A severity-tagged structural issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDiagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,

    /// Human-readable message
    pub message: String,

    /// Position in the rendered document (best-effort)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Target namespace of the document the issue was found in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ValidationDiagnostic {
    /// Create a diagnostic without position
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            position: None,
            namespace: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Set the position; line 0 together with column 0 means "unknown"
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.position = if line == 0 && column == 0 {
            None
        } else {
            Some(Position { line, column })
        };
        self
    }

    /// Set the namespace of the offending document
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl std::fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(Position { line, column }) => write!(f, "({}, {}): {}", line, column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_position_means_unknown() {
        let diag = ValidationDiagnostic::warning("Empty type").with_position(0, 0);
        assert_eq!(diag.position, None);
        assert_eq!(diag.to_string(), "Empty type");
    }

    #[test]
    fn partial_position_is_kept() {
        let diag = ValidationDiagnostic::error("Bad name").with_position(0, 7);
        assert_eq!(diag.position, Some(Position { line: 0, column: 7 }));

        let diag = ValidationDiagnostic::error("Bad name").with_position(12, 5);
        assert_eq!(diag.to_string(), "(12, 5): Bad name");
        assert!(diag.is_error());
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = ValidationDiagnostic::error("Type 'urn:a:Missing' is not declared.")
            .with_position(4, 9);

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"error\""));
        assert!(json.contains("\"line\":4"));
        assert!(!json.contains("namespace"));
    }
}

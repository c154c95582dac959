//! Progress logging
//!
//! Every pipeline component writes its user-facing progress lines through one
//! injected [`LogSink`]. Library internals additionally emit `tracing`
//! events at debug level.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Priority of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Informational progress message
    Normal,

    /// Potential issue that does not stop the export, but may lead to
    /// unexpected results when the generated schemas are used
    Warning,

    /// Issue with an exported type, a module or a schema file
    Error,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Destination for priority-tagged log lines
pub trait LogSink {
    fn write_line(&self, priority: Priority, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(Priority, &str),
{
    fn write_line(&self, priority: Priority, message: &str) {
        self(priority, message)
    }
}

/// Keeps log lines in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: RefCell<Vec<(Priority, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines written so far
    pub fn lines(&self) -> Vec<(Priority, String)> {
        self.lines.borrow().clone()
    }

    /// Messages written with the given priority
    pub fn messages(&self, priority: Priority) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(p, _)| *p == priority)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }
}

impl LogSink for RecordingSink {
    fn write_line(&self, priority: Priority, message: &str) {
        self.lines.borrow_mut().push((priority, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink() {
        let sink = RecordingSink::new();
        sink.write_line(Priority::Normal, "one");
        sink.write_line(Priority::Error, "two");

        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.messages(Priority::Error), vec!["two".to_string()]);
        assert!(sink.messages(Priority::Warning).is_empty());
    }

    #[test]
    fn closures_are_sinks() {
        let seen = RefCell::new(Vec::new());
        let sink = |priority: Priority, message: &str| {
            seen.borrow_mut().push(format!("{}: {}", priority, message));
        };

        sink.write_line(Priority::Warning, "careful");
        assert_eq!(*seen.borrow(), vec!["Warning: careful".to_string()]);
    }
}

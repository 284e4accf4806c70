//! Shared types for logwatch
//!
//! This crate contains the data passed between the tail loop and the alert
//! dispatcher.

use chrono::{DateTime, Utc};

// ============================================================================
// Log Types
// ============================================================================

/// A single line read from the watched file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// Line number counted from the moment the watcher started (1-based)
    pub line_number: u64,

    /// Raw text, including its line terminator
    pub raw: String,
}

impl LogLine {
    pub fn new(line_number: u64, raw: String) -> Self {
        Self { line_number, raw }
    }
}

/// Fields extracted from a log line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRecord {
    /// HTTP-style status code, kept as text
    pub status_code: String,

    /// Upstream server address
    pub upstream_addr: String,
}

impl ParsedRecord {
    pub fn new(status_code: impl Into<String>, upstream_addr: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            upstream_addr: upstream_addr.into(),
        }
    }

    /// Whether the status code denotes a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code.starts_with('5')
    }
}

/// A detected server error, ready to be handed to an alert sink
#[derive(Clone, Debug)]
pub struct AlertEvent {
    /// The offending line, verbatim
    pub raw: String,

    pub line_number: u64,
    pub status_code: String,
    pub upstream_addr: String,

    /// When the line was seen by the watcher
    pub detected_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Build an alert for a parsed line
    pub fn new(line: &LogLine, record: ParsedRecord) -> Self {
        Self {
            raw: line.raw.clone(),
            line_number: line.line_number,
            status_code: record.status_code,
            upstream_addr: record.upstream_addr,
            detected_at: Utc::now(),
        }
    }

    /// Alert payload text: the raw line
    pub fn message(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_detection() {
        assert!(ParsedRecord::new("500", "10.0.0.1").is_server_error());
        assert!(ParsedRecord::new("503", "10.0.0.1").is_server_error());
        assert!(!ParsedRecord::new("200", "10.0.0.1").is_server_error());
        assert!(!ParsedRecord::new("404", "10.0.0.1").is_server_error());
        assert!(!ParsedRecord::new("", "10.0.0.1").is_server_error());
    }

    #[test]
    fn test_prefix_match_only() {
        // Only the first character is inspected
        assert!(ParsedRecord::new("5xx", "-").is_server_error());
        assert!(!ParsedRecord::new("-500", "-").is_server_error());
    }

    #[test]
    fn test_alert_keeps_raw_line() {
        let line = LogLine::new(3, "a b c d e f g h 503 x\n".to_string());
        let alert = AlertEvent::new(&line, ParsedRecord::new("503", "x"));
        assert_eq!(alert.message(), "a b c d e f g h 503 x\n");
        assert_eq!(alert.line_number, 3);
    }
}

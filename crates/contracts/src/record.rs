//! LogRecord - the value handed to every sink

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::Severity;

/// One dispatched log call.
///
/// Built once by the dispatcher, then only borrowed by sinks. Sinks that want
/// to keep it clone it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    timestamp_ms: i64,
    severity: Severity,
    module: String,
    message: String,
}

impl LogRecord {
    /// Create a record stamped with the current wall-clock time
    pub fn new(severity: Severity, module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_timestamp(Utc::now().timestamp_millis(), severity, module, message)
    }

    /// Create a record with an explicit timestamp (ms since epoch)
    pub fn with_timestamp(
        timestamp_ms: i64,
        severity: Severity,
        module: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp_ms,
            severity,
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Uppercase severity label (`INFO`, `WARNING`, ...)
    pub fn label(&self) -> &'static str {
        self.severity.label()
    }

    /// Module name; empty when the logger was created without one
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Timestamp as a UTC datetime, `None` if outside chrono's range
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    /// ISO-8601 timestamp, e.g. `2024-05-01T12:00:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        match self.datetime() {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => self.timestamp_ms.to_string(),
        }
    }

    /// Render as a single text line:
    /// `<timestamp>: <LEVEL>: [<module>: ]<message>\n`
    pub fn render_line(&self) -> String {
        format!("{self}\n")
    }
}

/// The line body, without the trailing newline
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: ", self.iso_timestamp(), self.label())?;
        if !self.module.is_empty() {
            write!(f, "{}: ", self.module)?;
        }
        f.write_str(&self.message)
    }
}

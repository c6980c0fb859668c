//! TracingSink - re-emits records as tracing events

use contracts::{ContractError, LogRecord, LogSink, Severity};
use tracing::{debug, error, info, warn};

/// Sink that forwards records to the active tracing subscriber
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    /// Create a new TracingSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl LogSink for TracingSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, record: &LogRecord) -> Result<(), ContractError> {
        let module = record.module();
        let timestamp_ms = record.timestamp_ms();
        let message = record.message();

        match record.severity() {
            Severity::Debug => {
                debug!(target: "logfan", module, timestamp_ms, "{message}");
            }
            Severity::Info => {
                info!(target: "logfan", module, timestamp_ms, "{message}");
            }
            Severity::Warning => {
                warn!(target: "logfan", module, timestamp_ms, "{message}");
            }
            Severity::Error => {
                error!(target: "logfan", module, timestamp_ms, "{message}");
            }
        }
        Ok(())
    }
}

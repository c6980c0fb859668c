//! LogSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use crate::{ContractError, LogRecord};

/// Record output trait
///
/// All sink implementations must implement this trait. Sinks are shared
/// between threads behind an `Arc`, so `write` takes `&self` and any
/// mutable state lives behind the sink's own lock.
pub trait LogSink: Send + Sync {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one record
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&self, record: &LogRecord) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&self) -> Result<(), ContractError> {
        Ok(())
    }
}

//! MemorySink - keeps every record it receives

use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{ContractError, LogRecord, LogSink};

/// Sink that retains records in memory, in arrival order
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    /// Create an empty MemorySink
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of every record received so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Messages only
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message().to_string()).collect()
    }

    /// Records rendered in console format
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(LogRecord::render_line).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop everything received so far
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.lock().push(record.clone());
        Ok(())
    }
}

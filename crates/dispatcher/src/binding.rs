//! SinkBinding - a sink paired with its own minimum severity

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use contracts::{LogRecord, LogSink, Severity};

use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// One entry of the dispatcher's binding list
#[derive(Clone)]
pub struct SinkBinding {
    /// Bound sink
    sink: Arc<dyn LogSink>,
    /// Inclusive threshold for this sink
    min_level: Severity,
    /// Shared metrics, survive list rebuilds
    metrics: Arc<SinkMetrics>,
}

impl SinkBinding {
    /// Bind a sink at the given threshold
    pub fn new(sink: Arc<dyn LogSink>, min_level: Severity) -> Self {
        Self {
            sink,
            min_level,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        self.sink.name()
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Whether a record at `severity` qualifies for this sink
    pub fn accepts(&self, severity: Severity) -> bool {
        severity >= self.min_level
    }

    /// Hand a record to the sink if it qualifies.
    ///
    /// Write errors stay inside the binding: they are counted and reported,
    /// and the caller moves on to the next binding. Returns true if the sink
    /// accepted the record.
    pub fn deliver(&self, record: &LogRecord) -> bool {
        if !self.accepts(record.severity()) {
            self.metrics.inc_filtered_count();
            return false;
        }

        match self.sink.write(record) {
            Ok(()) => {
                self.metrics.inc_write_count();
                observability::record_sink_write(self.name(), true);
                true
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                observability::record_sink_write(self.name(), false);
                warn!(
                    sink = %self.name(),
                    level = %record.severity(),
                    error = %e,
                    "Write failed"
                );
                // Continue processing - don't crash on single failure
                false
            }
        }
    }

    /// Flush the sink, reporting failures the same way as writes
    pub fn flush(&self) -> bool {
        match self.sink.flush() {
            Ok(()) => true,
            Err(e) => {
                self.metrics.inc_failure_count();
                warn!(sink = %self.name(), error = %e, "Flush failed");
                false
            }
        }
    }

    /// Point-in-time view for reporting
    pub fn snapshot(&self) -> BindingSnapshot {
        BindingSnapshot {
            name: self.name().to_string(),
            min_level: self.min_level,
            metrics: self.metrics.snapshot(),
        }
    }
}

impl fmt::Debug for SinkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkBinding")
            .field("sink", &self.name())
            .field("min_level", &self.min_level)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Reporting view of a binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSnapshot {
    pub name: String,
    pub min_level: Severity,
    pub metrics: MetricsSnapshot,
}

//! Dispatch metrics, published through the `metrics` facade.
//!
//! Every function is a no-op until a recorder is installed (see
//! [`crate::init_with_config`]).

use contracts::Severity;
use metrics::counter;

/// Record a log call that passed the global threshold
pub fn record_record_dispatched(severity: Severity) {
    counter!(
        "logfan_records_dispatched_total",
        "level" => severity.name()
    )
    .increment(1);
}

/// Record a log call dropped by the global threshold
pub fn record_record_suppressed(severity: Severity) {
    counter!(
        "logfan_records_suppressed_total",
        "level" => severity.name()
    )
    .increment(1);
}

/// Record one sink write attempt
pub fn record_sink_write(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "logfan_sink_writes_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

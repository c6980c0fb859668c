//! # Contracts
//!
//! Shared types for the logging facade, depended on by every other crate in the workspace.
//! Reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Record timestamps are wall-clock milliseconds since the Unix epoch
//! - Rendering is always UTC, ISO-8601 with millisecond precision

mod config;
mod error;
mod record;
mod severity;
mod sink;

pub use config::*;
pub use error::*;
pub use record::LogRecord;
pub use severity::Severity;
pub use sink::LogSink;

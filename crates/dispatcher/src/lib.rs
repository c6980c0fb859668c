//! # Dispatcher
//!
//! 日志分发模块。
//!
//! 负责：
//! - 全局级别过滤，被抑制的消息不做格式化
//! - 按绑定顺序 fan-out 到多个 sinks，每个 sink 有自己的最低级别
//! - 隔离失败的 sink，不影响其余 sink 和调用方

pub mod binding;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod logger;
mod macros;
pub mod metrics;
pub mod sinks;

pub use binding::{BindingSnapshot, SinkBinding};
pub use contracts::{LogRecord, LogSink, Severity};
pub use dispatcher::{create_dispatcher, create_sink, Dispatcher};
pub use error::DispatcherError;
pub use format::{format_message, LogArg};
pub use logger::ModuleLogger;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, FileSink, FileSinkConfig, MemorySink, TracingSink, CONSOLE_BUFFER_CAPACITY};

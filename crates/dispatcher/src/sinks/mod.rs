//! Sink implementations
//!
//! Contains ConsoleSink, FileSink, MemorySink and TracingSink.

mod console;
mod file;
mod memory;
mod tracing_sink;

pub use self::console::{ConsoleSink, CONSOLE_BUFFER_CAPACITY};
pub use self::file::{FileSink, FileSinkConfig};
pub use self::memory::MemorySink;
pub use self::tracing_sink::TracingSink;

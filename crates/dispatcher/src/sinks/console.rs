//! ConsoleSink - the built-in sink, one text line per record on stdout

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use contracts::{ContractError, LogRecord, LogSink};

/// Initial capacity of the line-assembly buffer
pub const CONSOLE_BUFFER_CAPACITY: usize = 16 * 1024;

/// Sink that renders records as text lines:
/// `<ISO-8601>: <LEVEL>: [<module>: ]<message>\n`
///
/// Each line is rendered completely into the sink's buffer and handed to
/// the stream with a single `write_all`. On stdout that call holds the
/// process-wide stdout lock, so lines from concurrent callers and from
/// several console sinks never interleave.
pub struct ConsoleSink {
    name: String,
    out: Mutex<LineWriter>,
}

struct LineWriter {
    line: Vec<u8>,
    writer: Box<dyn Write + Send>,
}

impl LineWriter {
    fn write_record(&mut self, record: &LogRecord) -> io::Result<()> {
        self.line.clear();
        writeln!(self.line, "{record}")?;
        let result = self
            .writer
            .write_all(&self.line)
            .and_then(|()| self.writer.flush());
        if self.line.capacity() > CONSOLE_BUFFER_CAPACITY {
            self.line.shrink_to(CONSOLE_BUFFER_CAPACITY);
        }
        result
    }
}

impl ConsoleSink {
    /// Console sink on stdout, named `console`
    pub fn new() -> Self {
        Self::named("console")
    }

    /// Console sink on stdout with a custom name
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_writer(name, io::stdout())
    }

    /// Console-format sink on an arbitrary stream
    pub fn with_writer<W: Write + Send + 'static>(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            out: Mutex::new(LineWriter {
                line: Vec::with_capacity(CONSOLE_BUFFER_CAPACITY),
                writer: Box::new(writer),
            }),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, record: &LogRecord) -> Result<(), ContractError> {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_record(record)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn flush(&self) -> Result<(), ContractError> {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }
}

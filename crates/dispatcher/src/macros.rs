//! Call-site macros over [`ModuleLogger`](crate::ModuleLogger)
//!
//! Each argument goes through `LogArg::from`, so mixed types can be passed
//! without wrapping them by hand:
//!
//! ```
//! use dispatcher::{log_info, Dispatcher, MemorySink};
//! use std::sync::Arc;
//!
//! let dispatcher = Dispatcher::empty();
//! let sink = Arc::new(MemorySink::new("mem"));
//! dispatcher.add_sink(sink.clone(), "debug").unwrap();
//!
//! let log = dispatcher.get_logger("db");
//! log_info!(log, "query took %dms", 42);
//! assert_eq!(sink.messages(), vec!["query took 42ms"]);
//! ```

/// Log at an explicit severity
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($severity, &[$($crate::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug(&[$($crate::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.info(&[$($crate::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.warning(&[$($crate::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr $(, $arg:expr)* $(,)?) => {
        $logger.error(&[$($crate::LogArg::from($arg)),*])
    };
}

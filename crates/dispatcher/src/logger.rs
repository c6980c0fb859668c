//! ModuleLogger - per-module logging surface

use std::fmt;
use std::sync::Arc;

use contracts::Severity;

use crate::dispatcher::Dispatcher;
use crate::format::{format_message, LogArg};

/// A module name bound to a dispatcher.
///
/// Cheap to clone; holds no state besides the name and the dispatcher
/// handle. Messages are only formatted when the global threshold lets
/// them through.
#[derive(Clone)]
pub struct ModuleLogger {
    module: Arc<str>,
    dispatcher: Dispatcher,
}

impl ModuleLogger {
    pub(crate) fn new(dispatcher: Dispatcher, module: Arc<str>) -> Self {
        Self { module, dispatcher }
    }

    /// Module name stamped on every record (may be empty)
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Dispatcher this logger routes through
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Whether a call at `severity` would pass the global threshold
    pub fn is_enabled(&self, severity: Severity) -> bool {
        self.dispatcher.is_enabled(severity)
    }

    /// Log printf-style arguments at the given severity
    pub fn log(&self, severity: Severity, args: &[LogArg]) {
        self.dispatcher
            .dispatch_with(severity, &self.module, || format_message(args));
    }

    /// Log a `format_args!` message at the given severity
    pub fn log_fmt(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.dispatcher
            .dispatch_with(severity, &self.module, || args.to_string());
    }

    pub fn debug(&self, args: &[LogArg]) {
        self.log(Severity::Debug, args);
    }

    pub fn info(&self, args: &[LogArg]) {
        self.log(Severity::Info, args);
    }

    pub fn warning(&self, args: &[LogArg]) {
        self.log(Severity::Warning, args);
    }

    pub fn error(&self, args: &[LogArg]) {
        self.log(Severity::Error, args);
    }
}

impl fmt::Debug for ModuleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLogger")
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

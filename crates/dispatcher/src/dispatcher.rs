//! Dispatcher - global threshold plus ordered fan-out to sink bindings

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, instrument};

use contracts::{LogRecord, LogSink, LoggingConfig, Severity, SinkConfig, SinkType};

use crate::binding::{BindingSnapshot, SinkBinding};
use crate::error::DispatcherError;
use crate::logger::ModuleLogger;
use crate::sinks::{ConsoleSink, FileSink, TracingSink};

/// Routes log calls to sinks.
///
/// Cloning is cheap and every clone shares the same threshold and binding
/// list, so one dispatcher can be handed to every component that logs.
///
/// The binding list is an immutable snapshot swapped under a write lock.
/// Dispatch takes the current snapshot and releases the lock before calling
/// any sink, so a dispatch racing with `add_sink`/`clear_sinks` sees either
/// the whole old list or the whole new one, and sinks may log through the
/// dispatcher themselves.
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

struct Shared {
    min_level: AtomicU8,
    bindings: RwLock<Arc<Vec<SinkBinding>>>,
}

impl Dispatcher {
    /// Global threshold `info`, one console binding on stdout at `debug`
    pub fn new() -> Self {
        Self::with_console(ConsoleSink::new())
    }

    /// Same defaults as [`Dispatcher::new`], with the given console sink
    pub fn with_console(console: ConsoleSink) -> Self {
        let dispatcher = Self::empty();
        dispatcher.add_sink_at(Arc::new(console), Severity::Debug);
        dispatcher
    }

    /// Global threshold `info`, no bindings
    pub fn empty() -> Self {
        Self {
            shared: Arc::new(Shared {
                min_level: AtomicU8::new(Severity::Info.as_u8()),
                bindings: RwLock::new(Arc::new(Vec::new())),
            }),
        }
    }

    /// Logger handle for `module` (any string, including empty)
    pub fn get_logger(&self, module: impl Into<String>) -> ModuleLogger {
        ModuleLogger::new(self.clone(), Arc::from(module.into()))
    }

    /// Set the global threshold; values outside 0..=3 are clamped
    pub fn set_min_level(&self, level: i64) {
        self.set_min_severity(Severity::from_clamped(level));
    }

    /// Set the global threshold
    pub fn set_min_severity(&self, severity: Severity) {
        self.shared
            .min_level
            .store(severity.as_u8(), Ordering::Release);
    }

    /// Current global threshold
    pub fn min_level(&self) -> Severity {
        Severity::from_clamped(i64::from(self.shared.min_level.load(Ordering::Acquire)))
    }

    /// Whether a call at `severity` passes the global threshold
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.min_level()
    }

    /// Remove every binding
    pub fn clear_sinks(&self) {
        let removed = {
            let mut bindings = self.write_bindings();
            std::mem::replace(&mut *bindings, Arc::new(Vec::new())).len()
        };
        debug!(removed, "Sinks cleared");
    }

    /// Bind a sink at the level named `min_level`.
    ///
    /// # Errors
    /// Unknown level names (matched exactly: `debug`, `info`, `warning`,
    /// `error`) fail with an invalid-argument error and leave the binding
    /// list untouched.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>, min_level: &str) -> Result<(), DispatcherError> {
        let severity: Severity = min_level.parse()?;
        self.add_sink_at(sink, severity);
        Ok(())
    }

    /// Bind a sink at `min_level`, appended after existing bindings
    pub fn add_sink_at(&self, sink: Arc<dyn LogSink>, min_level: Severity) {
        let binding = SinkBinding::new(sink, min_level);
        let name = binding.name().to_string();
        let count = {
            let mut bindings = self.write_bindings();
            let mut next = Vec::with_capacity(bindings.len() + 1);
            next.extend(bindings.iter().cloned());
            next.push(binding);
            let count = next.len();
            *bindings = Arc::new(next);
            count
        };
        debug!(sink = %name, min_level = %min_level, bindings = count, "Sink added");
    }

    /// Number of bindings
    pub fn sink_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Get metrics for all bindings
    pub fn metrics(&self) -> Vec<BindingSnapshot> {
        self.snapshot().iter().map(SinkBinding::snapshot).collect()
    }

    /// Route one message: global threshold, then every qualifying binding in order
    pub fn dispatch(&self, severity: Severity, module: &str, message: impl Into<String>) {
        self.dispatch_with(severity, module, || message.into());
    }

    /// Like [`Dispatcher::dispatch`], building the message only if it passes
    /// the global threshold
    pub fn dispatch_with<F>(&self, severity: Severity, module: &str, message: F)
    where
        F: FnOnce() -> String,
    {
        if !self.is_enabled(severity) {
            observability::record_record_suppressed(severity);
            return;
        }

        let record = LogRecord::new(severity, module, message());
        observability::record_record_dispatched(severity);

        let bindings = self.snapshot();
        for binding in bindings.iter() {
            binding.deliver(&record);
        }
    }

    /// Flush every bound sink; returns the number of sinks that failed
    pub fn flush(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|binding| !binding.flush())
            .count()
    }

    fn snapshot(&self) -> Arc<Vec<SinkBinding>> {
        Arc::clone(
            &self
                .shared
                .bindings
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn write_bindings(&self) -> std::sync::RwLockWriteGuard<'_, Arc<Vec<SinkBinding>>> {
        self.shared
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("min_level", &self.min_level())
            .field("bindings", &self.snapshot())
            .finish()
    }
}

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
pub fn create_sink(config: &SinkConfig) -> Result<Arc<dyn LogSink>, DispatcherError> {
    match config.sink_type {
        SinkType::Console => Ok(Arc::new(ConsoleSink::named(&config.name))),
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(sink))
        }
        SinkType::Tracing => Ok(Arc::new(TracingSink::new(&config.name))),
    }
}

/// Build a dispatcher from configuration
///
/// Levels are resolved before any sink is opened, so a bad level name never
/// leaves a half-created file behind.
#[instrument(
    name = "dispatcher_create",
    skip(config),
    fields(sink_count = config.sinks.len())
)]
pub fn create_dispatcher(config: &LoggingConfig) -> Result<Dispatcher, DispatcherError> {
    let min_level = config.min_level.resolve()?;
    let console_level: Severity = config.console_min_level.parse()?;
    let sink_levels = config
        .sinks
        .iter()
        .map(|s| s.min_level.parse::<Severity>())
        .collect::<Result<Vec<_>, _>>()?;

    let dispatcher = Dispatcher::empty();
    dispatcher.set_min_severity(min_level);

    if config.default_console {
        dispatcher.add_sink_at(Arc::new(ConsoleSink::new()), console_level);
    }
    for (sink_config, level) in config.sinks.iter().zip(sink_levels) {
        dispatcher.add_sink_at(create_sink(sink_config)?, level);
    }

    info!(
        min_level = %min_level,
        sinks = dispatcher.sink_count(),
        "Dispatcher created"
    );
    Ok(dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;
    use contracts::{ContractError, LevelSetting};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    fn memory_dispatcher(level: &str) -> (Dispatcher, Arc<MemorySink>) {
        let dispatcher = Dispatcher::empty();
        let sink = Arc::new(MemorySink::new("mem"));
        dispatcher.add_sink(sink.clone(), level).unwrap();
        (dispatcher, sink)
    }

    #[test]
    fn test_defaults() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.min_level(), Severity::Info);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "console");
        assert_eq!(metrics[0].min_level, Severity::Debug);
    }

    #[test]
    fn test_set_min_level_clamps() {
        let dispatcher = Dispatcher::empty();
        dispatcher.set_min_level(-5);
        assert_eq!(dispatcher.min_level(), Severity::Debug);
        dispatcher.set_min_level(99);
        assert_eq!(dispatcher.min_level(), Severity::Error);
        dispatcher.set_min_level(2);
        assert_eq!(dispatcher.min_level(), Severity::Warning);
    }

    #[test]
    fn test_global_threshold_is_inclusive() {
        let (dispatcher, sink) = memory_dispatcher("debug");
        dispatcher.set_min_level(2);
        dispatcher.dispatch(Severity::Info, "m", "dropped");
        dispatcher.dispatch(Severity::Warning, "m", "at threshold");
        dispatcher.dispatch(Severity::Error, "m", "above");
        assert_eq!(sink.messages(), vec!["at threshold", "above"]);
    }

    #[test]
    fn test_suppressed_message_is_never_built() {
        let (dispatcher, sink) = memory_dispatcher("debug");
        let built = AtomicUsize::new(0);
        dispatcher.dispatch_with(Severity::Debug, "m", || {
            built.fetch_add(1, Ordering::Relaxed);
            "expensive".to_string()
        });
        assert_eq!(built.load(Ordering::Relaxed), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_add_sink_unknown_level_leaves_state() {
        let (dispatcher, _) = memory_dispatcher("debug");
        let err = dispatcher
            .add_sink(Arc::new(MemorySink::new("other")), "verbose")
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(matches!(
            err,
            DispatcherError::Contract(ContractError::UnknownLevel { ref name }) if name == "verbose"
        ));
        assert_eq!(dispatcher.sink_count(), 1);

        // case-sensitive
        assert!(dispatcher
            .add_sink(Arc::new(MemorySink::new("other")), "INFO")
            .is_err());
        assert_eq!(dispatcher.sink_count(), 1);
    }

    #[test]
    fn test_same_sink_twice_receives_twice() {
        let (dispatcher, sink) = memory_dispatcher("debug");
        dispatcher.add_sink(sink.clone(), "info").unwrap();
        dispatcher.dispatch(Severity::Info, "", "dup");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_clear_sinks() {
        let (dispatcher, sink) = memory_dispatcher("debug");
        dispatcher.clear_sinks();
        assert_eq!(dispatcher.sink_count(), 0);
        for severity in Severity::ALL {
            dispatcher.dispatch(severity, "m", "nobody listens");
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_per_sink_threshold() {
        let dispatcher = Dispatcher::empty();
        let warn_sink = Arc::new(MemorySink::new("warn"));
        let debug_sink = Arc::new(MemorySink::new("debug"));
        dispatcher.add_sink(warn_sink.clone(), "warning").unwrap();
        dispatcher.add_sink(debug_sink.clone(), "debug").unwrap();

        dispatcher.dispatch(Severity::Info, "m", "info");

        assert!(warn_sink.is_empty());
        assert_eq!(debug_sink.messages(), vec!["info"]);

        let metrics = dispatcher.metrics();
        assert_eq!(metrics[0].metrics.filtered_count, 1);
        assert_eq!(metrics[1].metrics.write_count, 1);
    }

    /// Sink that logs through the dispatcher it is bound to
    struct EchoSink {
        dispatcher: Dispatcher,
        inner: Arc<MemorySink>,
    }

    impl LogSink for EchoSink {
        fn name(&self) -> &str {
            "echo"
        }

        fn write(&self, record: &LogRecord) -> Result<(), ContractError> {
            self.inner.write(record)?;
            if record.module() != "echo" {
                self.dispatcher.dispatch(record.severity(), "echo", "seen");
            }
            Ok(())
        }
    }

    #[test]
    fn test_reentrant_sink_does_not_deadlock() {
        let dispatcher = Dispatcher::empty();
        let inner = Arc::new(MemorySink::new("inner"));
        dispatcher.add_sink_at(
            Arc::new(EchoSink {
                dispatcher: dispatcher.clone(),
                inner: inner.clone(),
            }),
            Severity::Debug,
        );

        dispatcher.dispatch(Severity::Info, "app", "hello");
        assert_eq!(inner.messages(), vec!["hello", "seen"]);
    }

    #[test]
    fn test_concurrent_dispatch_and_mutation() {
        let (dispatcher, sink) = memory_dispatcher("debug");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let dispatcher = dispatcher.clone();
                scope.spawn(move || {
                    for i in 0..100 {
                        dispatcher.dispatch(Severity::Info, "worker", format!("{i}"));
                    }
                });
            }
            let dispatcher = dispatcher.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    dispatcher.add_sink_at(Arc::new(MemorySink::new("churn")), Severity::Error);
                }
            });
        });

        assert_eq!(sink.len(), 400);
        assert_eq!(dispatcher.sink_count(), 51);
    }

    #[test]
    fn test_create_dispatcher_from_config() {
        let config = LoggingConfig {
            min_level: LevelSetting::Number(7),
            default_console: false,
            console_min_level: "debug".into(),
            sinks: vec![SinkConfig {
                name: "events".into(),
                sink_type: SinkType::Tracing,
                min_level: "warning".into(),
                params: HashMap::new(),
            }],
        };

        let dispatcher = create_dispatcher(&config).unwrap();
        assert_eq!(dispatcher.min_level(), Severity::Error);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "events");
        assert_eq!(metrics[0].min_level, Severity::Warning);
    }

    #[test]
    fn test_create_dispatcher_rejects_bad_level() {
        let mut config = LoggingConfig::default();
        config.sinks.push(SinkConfig {
            name: "events".into(),
            sink_type: SinkType::Tracing,
            min_level: "loud".into(),
            params: HashMap::new(),
        });
        let err = create_dispatcher(&config).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_create_file_sink_without_path_fails() {
        let config = SinkConfig {
            name: "audit".into(),
            sink_type: SinkType::File,
            min_level: "debug".into(),
            params: HashMap::new(),
        };
        let Err(err) = create_sink(&config) else {
            panic!("file sink without a path should not be created");
        };
        assert!(matches!(err, DispatcherError::SinkCreation { ref name, .. } if name == "audit"));
    }
}

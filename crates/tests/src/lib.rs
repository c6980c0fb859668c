//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 分发行为的跨 crate 属性测试
//! - 配置文件 -> dispatcher -> sinks 的端到端测试

#[cfg(test)]
mod support {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use dispatcher::ConsoleSink;

    /// stdout stand-in shared between the sink and the test
    #[derive(Clone, Default)]
    pub struct CapturedStdout(Arc<Mutex<Vec<u8>>>);

    impl CapturedStdout {
        pub fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        pub fn console(&self) -> ConsoleSink {
            ConsoleSink::with_writer("console", self.clone())
        }
    }

    impl Write for CapturedStdout {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod dispatch_properties {
    use std::sync::Arc;

    use contracts::{ContractError, LogRecord, LogSink, Severity};
    use dispatcher::{log_debug, log_info, Dispatcher, DispatcherError, MemorySink};

    use crate::support::CapturedStdout;

    #[test]
    fn test_thresholds_are_inclusive_at_both_stages() {
        let dispatcher = Dispatcher::empty();
        dispatcher.set_min_severity(Severity::Warning);
        let sink = Arc::new(MemorySink::new("mem"));
        dispatcher.add_sink(sink.clone(), "error").unwrap();

        let log = dispatcher.get_logger("m");
        log.warning(&["global ok, sink too low".into()]);
        log.error(&["both at threshold".into()]);

        assert_eq!(sink.messages(), vec!["both at threshold"]);
    }

    #[test]
    fn test_min_level_clamping() {
        let stdout = CapturedStdout::default();
        let dispatcher = Dispatcher::with_console(stdout.console());
        let log = dispatcher.get_logger("");

        dispatcher.set_min_level(-5);
        log.debug(&["low".into()]);
        assert!(stdout.text().ends_with(": DEBUG: low\n"), "got: {}", stdout.text());

        dispatcher.set_min_level(99);
        assert_eq!(dispatcher.min_level(), Severity::Error);
        log.warning(&["suppressed".into()]);
        log.error(&["kept".into()]);

        let text = stdout.text();
        assert!(!text.contains("suppressed"));
        assert!(text.ends_with(": ERROR: kept\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_unknown_level_is_rejected_atomically() {
        let dispatcher = Dispatcher::new();
        let err = dispatcher
            .add_sink(Arc::new(MemorySink::new("mem")), "verbose")
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(matches!(
            err,
            DispatcherError::Contract(ContractError::UnknownLevel { .. })
        ));
        assert_eq!(dispatcher.sink_count(), 1);
    }

    #[test]
    fn test_clear_sinks_silences_everything() {
        let stdout = CapturedStdout::default();
        let dispatcher = Dispatcher::with_console(stdout.console());
        let extra = Arc::new(MemorySink::new("mem"));
        dispatcher.add_sink(extra.clone(), "debug").unwrap();
        dispatcher.set_min_severity(Severity::Debug);

        dispatcher.clear_sinks();
        let log = dispatcher.get_logger("m");
        log.debug(&["a".into()]);
        log.info(&["b".into()]);
        log.warning(&["c".into()]);
        log.error(&["d".into()]);

        assert!(stdout.text().is_empty());
        assert!(extra.is_empty());
    }

    #[test]
    fn test_module_line_format() {
        let stdout = CapturedStdout::default();
        let dispatcher = Dispatcher::empty();
        dispatcher.add_sink(Arc::new(stdout.console()), "info").unwrap();

        let db = dispatcher.get_logger("db");
        log_debug!(db, "x=%d", 5);
        assert!(stdout.text().is_empty());

        log_info!(db, "x=%d", 5);
        let text = stdout.text();
        let (timestamp, rest) = text.split_once(": ").unwrap();
        assert_eq!(rest, "INFO: db: x=5\n");
        assert!(timestamp.ends_with('Z'));
        assert_eq!(timestamp.len(), "2024-05-01T12:00:00.123Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_only_qualifying_sinks_receive() {
        let dispatcher = Dispatcher::empty();
        let warning = Arc::new(MemorySink::new("warning"));
        let debug = Arc::new(MemorySink::new("debug"));
        dispatcher.add_sink(warning.clone(), "warning").unwrap();
        dispatcher.add_sink(debug.clone(), "debug").unwrap();

        dispatcher.get_logger("m").info(&["hello".into()]);

        assert!(warning.is_empty());
        assert_eq!(debug.messages(), vec!["hello"]);
    }

    /// Sink that rejects every record
    struct Rejecting;

    impl LogSink for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn write(&self, _record: &LogRecord) -> Result<(), ContractError> {
            Err(ContractError::sink_write("rejecting", "disk full"))
        }
    }

    #[test]
    fn test_failing_sink_is_isolated() {
        let dispatcher = Dispatcher::empty();
        let after = Arc::new(MemorySink::new("after"));
        dispatcher.add_sink(Arc::new(Rejecting), "debug").unwrap();
        dispatcher.add_sink(after.clone(), "debug").unwrap();

        dispatcher.get_logger("m").error(&["still delivered".into()]);

        assert_eq!(after.messages(), vec!["still delivered"]);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics[0].metrics.failure_count, 1);
        assert_eq!(metrics[0].metrics.write_count, 0);
        assert_eq!(metrics[1].metrics.write_count, 1);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::Severity;
    use dispatcher::{create_dispatcher, log_error, log_info, log_warning};

    /// Config file -> ConfigLoader -> create_dispatcher -> file sink on disk
    #[test]
    fn test_config_to_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("logs").join("audit.log");
        let config_path = dir.path().join("logfan.toml");
        fs::write(
            &config_path,
            format!(
                r#"
min_level = "info"
default_console = false

[[sinks]]
name = "audit"
sink_type = "file"
min_level = "warning"
[sinks.params]
path = "{}"
"#,
                log_path.display().to_string().replace('\\', "/")
            ),
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&config_path).unwrap();
        let dispatcher = create_dispatcher(&config).unwrap();
        assert_eq!(dispatcher.min_level(), Severity::Info);
        assert_eq!(dispatcher.sink_count(), 1);

        let log = dispatcher.get_logger("billing");
        log_info!(log, "invoice %s created", "A-1");
        log_warning!(log, "retry %d of %d", 2, 3);
        log_error!(log, "gave up", "after", 3, "tries");
        assert_eq!(dispatcher.flush(), 0);

        let contents = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2, "got: {contents}");
        assert!(lines[0].ends_with(": WARNING: billing: retry 2 of 3"));
        assert!(lines[1].ends_with(": ERROR: billing: gave up after 3 tries"));

        let metrics = dispatcher.metrics();
        assert_eq!(metrics[0].metrics.write_count, 2);
        assert_eq!(metrics[0].metrics.filtered_count, 1);
    }

    #[test]
    fn test_invalid_config_never_builds() {
        let result = ConfigLoader::load_from_str(
            r#"
[[sinks]]
name = "audit"
sink_type = "file"
"#,
            ConfigFormat::Toml,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("path"), "got: {err}");
    }

    #[test]
    fn test_json_config_with_numeric_level() {
        let config = ConfigLoader::load_from_str(
            r#"{ "min_level": 2, "default_console": true, "console_min_level": "error" }"#,
            ConfigFormat::Json,
        )
        .unwrap();
        let dispatcher = create_dispatcher(&config).unwrap();
        assert_eq!(dispatcher.min_level(), Severity::Warning);
        let metrics = dispatcher.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "console");
        assert_eq!(metrics[0].min_level, Severity::Error);
    }
}

//! `emit` command implementation.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use contracts::Severity;
use dispatcher::{create_dispatcher, Dispatcher, LogArg};

use crate::cli::EmitArgs;
use crate::error::CliError;

/// Execute the `emit` command
pub fn run_emit(args: &EmitArgs) -> Result<()> {
    let severity: Severity = args
        .level
        .parse()
        .with_context(|| format!("Invalid --level '{}'", args.level))?;

    let dispatcher = build_dispatcher(args)?;
    let log_args = to_log_args(&args.args)?;

    debug!(
        level = %severity,
        module = %args.module,
        sinks = dispatcher.sink_count(),
        "Emitting record"
    );

    let logger = dispatcher.get_logger(args.module.as_str());
    if !logger.is_enabled(severity) {
        debug!(
            level = %severity,
            min_level = %dispatcher.min_level(),
            "Record suppressed by global threshold"
        );
    }
    logger.log(severity, &log_args);

    let failed = dispatcher.flush();
    if failed > 0 {
        warn!(failed, "Some sinks failed to flush");
    }
    Ok(())
}

fn build_dispatcher(args: &EmitArgs) -> Result<Dispatcher> {
    let Some(path) = &args.config else {
        return Ok(Dispatcher::new());
    };
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    let config = config_loader::ConfigLoader::load_from_path(path)
        .map_err(CliError::from)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    let dispatcher = create_dispatcher(&config)
        .map_err(CliError::from)
        .context("Failed to build dispatcher")?;
    Ok(dispatcher)
}

/// The template stays a string; later arguments are typed when they look
/// like numbers or booleans, so `%o` and surplus arguments render them as such.
fn to_log_args(raw: &[String]) -> Result<Vec<LogArg>, CliError> {
    let (template, rest) = raw.split_first().ok_or(CliError::EmptyMessage)?;
    let mut out = Vec::with_capacity(raw.len());
    out.push(LogArg::from(template.as_str()));
    out.extend(rest.iter().map(|arg| typed_arg(arg)));
    Ok(out)
}

fn typed_arg(raw: &str) -> LogArg {
    if let Ok(i) = raw.parse::<i64>() {
        return LogArg::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return LogArg::Float(f);
        }
    }
    match raw {
        "true" => LogArg::Bool(true),
        "false" => LogArg::Bool(false),
        "null" => LogArg::Null,
        _ => LogArg::from(raw),
    }
}

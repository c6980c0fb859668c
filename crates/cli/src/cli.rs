//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// logfan - leveled logging facade with per-sink thresholds
#[derive(Parser, Debug)]
#[command(
    name = "logfan",
    author,
    version,
    about = "Leveled logging facade with per-sink thresholds",
    long_about = "Routes printf-style log calls through a dispatcher with a global minimum \n\
                  level to every bound sink whose own threshold the record meets.\n\n\
                  Records go to stdout (console sink); the tool's own diagnostics go to stderr."
)]
pub struct Cli {
    /// Increase diagnostic verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOGFAN_VERBOSE")]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Diagnostic output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LOGFAN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this port while the command runs (disabled when absent)
    #[arg(long, global = true, env = "LOGFAN_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Diagnostics and exporter settings implied by the global flags
    pub fn observability_config(&self) -> observability::ObservabilityConfig {
        let default_log_level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            }
        };

        observability::ObservabilityConfig {
            log_format: self.log_format.into(),
            metrics_port: self.metrics_port,
            default_log_level: default_log_level.to_string(),
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format the arguments printf-style and log them through a dispatcher
    Emit(EmitArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display resolved levels and sink bindings
    Info(InfoArgs),
}

/// Arguments for the `emit` command
#[derive(Parser, Debug, Clone)]
pub struct EmitArgs {
    /// Severity of the record (debug, info, warning, error)
    #[arg(short, long, default_value = "info")]
    pub level: String,

    /// Module name stamped on the record (empty = none)
    #[arg(short, long, default_value = "")]
    pub module: String,

    /// Configuration file (TOML or JSON); the default dispatcher is used when absent
    #[arg(short, long, env = "LOGFAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Template followed by its arguments, e.g. `"x=%d" 5`
    #[arg(required = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "logfan.toml", env = "LOGFAN_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "logfan.toml", env = "LOGFAN_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Diagnostic output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

//! LoggingConfig - Config Loader output
//!
//! Declarative description of a dispatcher: global threshold, built-in
//! console binding and extra sinks.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{ContractError, Severity};

/// Top-level logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Global minimum level, as a name or an integer (clamped to 0..=3)
    #[serde(default)]
    pub min_level: LevelSetting,

    /// Keep the built-in console binding
    #[serde(default = "default_true")]
    pub default_console: bool,

    /// Threshold of the built-in console binding
    #[serde(default = "default_sink_min_level")]
    pub console_min_level: String,

    /// Additional sinks, bound in declaration order
    #[serde(default)]
    #[validate(nested)]
    pub sinks: Vec<SinkConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_level: LevelSetting::default(),
            default_console: true,
            console_min_level: default_sink_min_level(),
            sinks: Vec::new(),
        }
    }
}

/// Global level setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    /// Level name, matched exactly
    Name(String),
    /// Numeric level, clamped
    Number(i64),
}

impl Default for LevelSetting {
    fn default() -> Self {
        Self::Name(Severity::Info.name().to_string())
    }
}

impl LevelSetting {
    /// Resolve to a severity. Numbers never fail; unknown names do.
    pub fn resolve(&self) -> Result<Severity, ContractError> {
        match self {
            Self::Name(name) => name.parse(),
            Self::Number(n) => Ok(Severity::from_clamped(*n)),
        }
    }
}

impl fmt::Display for LevelSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One additional sink binding
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SinkConfig {
    /// Sink name, unique within the configuration
    #[validate(length(min = 1, message = "sink name cannot be empty"))]
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Minimum level name for this binding
    #[serde(default = "default_sink_min_level")]
    pub min_level: String,

    /// Type-specific parameters (`path` for file sinks)
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Standard output
    Console,
    /// Append to a file (`path` param)
    File,
    /// Re-emit as tracing events
    Tracing,
}

fn default_true() -> bool {
    true
}

fn default_sink_min_level() -> String {
    Severity::Debug.name().to_string()
}

//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] contracts::ContractError),

    /// Dispatcher could not be built from the configuration
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    /// Nothing to log
    #[error("emit needs at least one argument")]
    EmptyMessage,
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}

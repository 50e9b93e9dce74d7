//! Errors raised while bootstrapping a process (configuration, tracing).

use thiserror::Error;

/// Bootstrap error types.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Tracing setup error: {0}")]
    Tracing(String),
}

impl BootstrapError {
    /// Returns the error code for logs and exit reports.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Tracing(_) => "TRACING_ERROR",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;

//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// One or more journeys did not pass
    #[error("Journey run failed: {message}")]
    JourneyFailed {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pomkit library error
    #[error("Pomkit error: {0}")]
    Pomkit(#[from] pomkit::PomError),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a journey failure
    #[must_use]
    pub fn journey_failed(message: impl Into<String>) -> Self {
        Self::JourneyFailed {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
    }

    #[test]
    fn test_journey_failed_error() {
        let err = CliError::journey_failed("1 of 5 journeys failed");
        assert_eq!(err.to_string(), "Journey run failed: 1 of 5 journeys failed");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_pomkit_error_from() {
        let cli_err: CliError = pomkit::PomError::config("missing base url").into();
        assert!(cli_err.to_string().starts_with("Pomkit error:"));
        assert!(cli_err.to_string().contains("missing base url"));
    }
}

//! Result and error types for pomkit.

use thiserror::Error;

/// Result type for pomkit operations
pub type PomResult<T> = Result<T, PomError>;

/// Errors that can occur while driving a page
#[derive(Debug, Error)]
pub enum PomError {
    /// Navigation did not reach the requested load state in time
    #[error("Navigation to {url} failed after {timeout_ms}ms: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Budget that was exceeded
        timeout_ms: u64,
        /// Error message
        message: String,
    },

    /// Element never became actionable (visible, stable, enabled)
    #[error("{operation} on {locator} timed out after {timeout_ms}ms: {reason}")]
    ActionTimeout {
        /// Named operation, e.g. `click`
        operation: String,
        /// Locator description
        locator: String,
        /// Budget that was exceeded
        timeout_ms: u64,
        /// Last observed reason the element was not actionable
        reason: String,
    },

    /// Element never reached the awaited visibility state
    #[error("{locator} did not become {state} within {timeout_ms}ms")]
    VisibilityTimeout {
        /// Locator description
        locator: String,
        /// Awaited state (`visible` or `hidden`)
        state: String,
        /// Budget that was exceeded
        timeout_ms: u64,
    },

    /// Zero elements matched when exactly one was required
    #[error("{operation}: no element matches {locator}")]
    NotFound {
        /// Named operation
        operation: String,
        /// Locator description
        locator: String,
    },

    /// Lookup of a locator name the registry never initialized
    #[error("Registry {registry} has no locator named '{name}'")]
    UnknownLocator {
        /// Registry name
        registry: String,
        /// Requested locator name
        name: String,
    },

    /// Operation called in the wrong state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Hard assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Soft assertions collected during a scenario
    #[error("{count} soft assertion(s) failed:\n{report}")]
    SoftAssertions {
        /// Number of failures
        count: usize,
        /// Rendered failure list
        report: String,
    },

    /// Scenario exceeded its overall ceiling
    #[error("Scenario '{scenario}' timed out after {timeout_ms}ms")]
    ScenarioTimeout {
        /// Scenario name
        scenario: String,
        /// Budget that was exceeded
        timeout_ms: u64,
    },

    /// Automation driver failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture data could not be loaded
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PomError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is one of the bounded-wait failures
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Navigation { .. }
                | Self::ActionTimeout { .. }
                | Self::VisibilityTimeout { .. }
                | Self::ScenarioTimeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_timeout_names_operation_and_budget() {
        let err = PomError::ActionTimeout {
            operation: "click".to_string(),
            locator: "cart link".to_string(),
            timeout_ms: 250,
            reason: "element is hidden".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("click"));
        assert!(text.contains("cart link"));
        assert!(text.contains("250ms"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_not_found_is_not_timeout() {
        let err = PomError::NotFound {
            operation: "text".to_string(),
            locator: "total".to_string(),
        };
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "text: no element matches total");
    }

    #[test]
    fn test_helpers() {
        assert!(matches!(PomError::driver("x"), PomError::Driver { .. }));
        assert!(matches!(
            PomError::invalid_state("x"),
            PomError::InvalidState { .. }
        ));
        assert!(matches!(PomError::config("x"), PomError::Config { .. }));
    }
}

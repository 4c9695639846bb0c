//! Assertion outcomes and the hard/soft policy.
//!
//! Every verification a page object performs produces an [`AssertionResult`];
//! the caller's [`AssertionPolicy`] decides whether a failure aborts the
//! scenario or is recorded in the [`SoftAssertions`] collector.

mod soft;

pub use soft::{AssertionFailure, AssertionSummary, SoftAssertions};

use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Whether a failed verification aborts the scenario
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssertionPolicy {
    /// Record the failure and keep going (default)
    #[default]
    Soft,
    /// Fail the current operation immediately
    Hard,
}

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Compare two values
    #[must_use]
    pub fn equals<T: PartialEq + Debug>(subject: &str, expected: &T, actual: &T) -> Self {
        if expected == actual {
            Self::pass()
        } else {
            Self::fail(format!("{subject}: expected {expected:?}, got {actual:?}"))
        }
    }

    /// Check that a string contains a substring
    #[must_use]
    pub fn contains(subject: &str, haystack: &str, needle: &str) -> Self {
        if haystack.contains(needle) {
            Self::pass()
        } else {
            Self::fail(format!(
                "{subject}: expected '{haystack}' to contain '{needle}'"
            ))
        }
    }

    /// Check a condition
    #[must_use]
    pub fn is_true(condition: bool, message: impl Into<String>) -> Self {
        if condition {
            Self::pass()
        } else {
            Self::fail(message)
        }
    }

    /// Apply a policy: hard failures become errors, soft failures are
    /// recorded in `soft` under `location`.
    pub fn enforce(
        self,
        policy: AssertionPolicy,
        soft: &mut SoftAssertions,
        location: &str,
    ) -> PomResult<()> {
        soft.count_assertion();
        if self.passed {
            return Ok(());
        }
        match policy {
            AssertionPolicy::Hard => Err(PomError::AssertionFailed {
                message: self.message,
            }),
            AssertionPolicy::Soft => {
                tracing::warn!(location, message = %self.message, "soft assertion failed");
                soft.record(self.message, Some(location.to_string()));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        assert!(AssertionResult::equals("total", &30, &30).passed);
        let failed = AssertionResult::equals("total", &30, &20);
        assert!(!failed.passed);
        assert_eq!(failed.message, "total: expected 30, got 20");
    }

    #[test]
    fn test_contains() {
        assert!(AssertionResult::contains("output", "Name:Jane Doe", "Jane Doe").passed);
        assert!(!AssertionResult::contains("output", "Name:", "Jane Doe").passed);
    }

    #[test]
    fn test_enforce_soft_records_and_continues() {
        let mut soft = SoftAssertions::new();
        let result = AssertionResult::fail("price mismatch").enforce(
            AssertionPolicy::Soft,
            &mut soft,
            "cart price",
        );
        assert!(result.is_ok());
        assert_eq!(soft.failure_count(), 1);
        assert_eq!(soft.failures()[0].location.as_deref(), Some("cart price"));
    }

    #[test]
    fn test_enforce_hard_fails_without_recording() {
        let mut soft = SoftAssertions::new();
        let result =
            AssertionResult::fail("modal open").enforce(AssertionPolicy::Hard, &mut soft, "modal");
        assert!(matches!(result, Err(PomError::AssertionFailed { .. })));
        assert!(soft.all_passed());
        assert_eq!(soft.assertion_count(), 1);
    }

    #[test]
    fn test_enforce_pass_counts() {
        let mut soft = SoftAssertions::new();
        AssertionResult::pass()
            .enforce(AssertionPolicy::Soft, &mut soft, "x")
            .unwrap();
        assert_eq!(soft.summary().passed, 1);
    }
}

//! Soft assertions.
//!
//! Collect every verification failure of a scenario so that one wrong price
//! does not hide a second, unrelated one.

use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// A single assertion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Message describing the failure
    pub message: String,
    /// Page element or operation the failure is about
    pub location: Option<String>,
    /// Index of this failure in the sequence
    pub index: usize,
}

impl AssertionFailure {
    /// Create a new assertion failure
    #[must_use]
    pub fn new(message: impl Into<String>, index: usize) -> Self {
        Self {
            message: message.into(),
            location: None,
            index,
        }
    }

    /// Set the location of the failure
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "[{location}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Soft assertions collector
///
/// ## Example
///
/// ```ignore
/// let mut soft = SoftAssertions::new();
/// soft.assert_eq(&10, &20, "price of Nokia lumia 1520");
/// soft.assert_true(false, "cart is empty");
/// // Both failures are collected
/// assert!(soft.verify().is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct SoftAssertions {
    failures: Vec<AssertionFailure>,
    assertion_count: usize,
}

impl SoftAssertions {
    /// Create a new soft assertions collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert two values are equal
    pub fn assert_eq<T: PartialEq + Debug>(&mut self, actual: &T, expected: &T, message: &str) {
        self.assertion_count += 1;
        if actual != expected {
            self.record(
                format!("{message}: expected {expected:?}, got {actual:?}"),
                None,
            );
        }
    }

    /// Assert a condition is true
    pub fn assert_true(&mut self, condition: bool, message: &str) {
        self.assertion_count += 1;
        if !condition {
            self.record(format!("{message}: expected true, got false"), None);
        }
    }

    /// Assert a string contains a substring
    pub fn assert_contains(&mut self, haystack: &str, needle: &str, message: &str) {
        self.assertion_count += 1;
        if !haystack.contains(needle) {
            self.record(
                format!("{message}: expected '{haystack}' to contain '{needle}'"),
                None,
            );
        }
    }

    /// Count one assertion without recording a result
    pub(crate) fn count_assertion(&mut self) {
        self.assertion_count += 1;
    }

    /// Record a failure
    pub fn record(&mut self, message: String, location: Option<String>) {
        let mut failure = AssertionFailure::new(message, self.failures.len());
        failure.location = location;
        self.failures.push(failure);
    }

    /// Get all failures
    #[must_use]
    pub fn failures(&self) -> &[AssertionFailure] {
        &self.failures
    }

    /// Get the number of failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Get the total number of assertions checked
    #[must_use]
    pub const fn assertion_count(&self) -> usize {
        self.assertion_count
    }

    /// Check if all assertions passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render every failure, one per line
    #[must_use]
    pub fn report(&self) -> String {
        self.failures
            .iter()
            .enumerate()
            .map(|(i, failure)| format!("  {}. {failure}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Verify all assertions passed
    ///
    /// # Errors
    ///
    /// Returns [`PomError::SoftAssertions`] listing every failure
    pub fn verify(&self) -> PomResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(PomError::SoftAssertions {
                count: self.failures.len(),
                report: self.report(),
            })
        }
    }

    /// Remove and return all failures, resetting the counters
    pub fn take(&mut self) -> Vec<AssertionFailure> {
        self.assertion_count = 0;
        std::mem::take(&mut self.failures)
    }

    /// Get a summary of the assertions
    #[must_use]
    pub fn summary(&self) -> AssertionSummary {
        AssertionSummary {
            total: self.assertion_count,
            passed: self.assertion_count.saturating_sub(self.failures.len()),
            failed: self.failures.len(),
        }
    }
}

/// Summary of assertion results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionSummary {
    /// Total assertions checked
    pub total: usize,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed
    pub failed: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod basic {
        use super::*;

        #[test]
        fn test_new_creates_empty() {
            let soft = SoftAssertions::new();
            assert!(soft.all_passed());
            assert_eq!(soft.failure_count(), 0);
            assert_eq!(soft.assertion_count(), 0);
            assert!(soft.verify().is_ok());
        }

        #[test]
        fn test_assert_eq_pass_and_fail() {
            let mut soft = SoftAssertions::new();
            soft.assert_eq(&42, &42, "answer");
            soft.assert_eq(&1, &2, "values should match");
            assert_eq!(soft.assertion_count(), 2);
            assert_eq!(soft.failure_count(), 1);
            assert!(soft.failures()[0].message.contains("expected 2, got 1"));
        }

        #[test]
        fn test_assert_contains() {
            let mut soft = SoftAssertions::new();
            soft.assert_contains("Name:Jane Doe", "Jane Doe", "output");
            assert!(soft.all_passed());
            soft.assert_contains("Name:Jane Doe", "jane@x.com", "output");
            assert_eq!(soft.failure_count(), 1);
        }
    }

    mod multiple_failures {
        use super::*;

        #[test]
        fn test_two_independent_failures_both_reported() {
            let mut soft = SoftAssertions::new();
            soft.assert_eq(&"360", &"790", "price of Samsung galaxy s6");
            soft.assert_true(true, "cart visible");
            soft.assert_eq(&"820", &"650", "price of Nokia lumia 1520");

            let err = soft.verify().unwrap_err();
            match err {
                PomError::SoftAssertions { count, report } => {
                    assert_eq!(count, 2);
                    assert!(report.contains("Samsung galaxy s6"));
                    assert!(report.contains("Nokia lumia 1520"));
                    assert!(report.contains("  1. "));
                    assert!(report.contains("  2. "));
                }
                other => panic!("unexpected error {other}"),
            }
        }

        #[test]
        fn test_summary_and_take() {
            let mut soft = SoftAssertions::new();
            soft.assert_true(false, "first");
            soft.assert_true(true, "second");
            let summary = soft.summary();
            assert_eq!(summary.total, 2);
            assert_eq!(summary.passed, 1);
            assert_eq!(summary.failed, 1);

            let taken = soft.take();
            assert_eq!(taken.len(), 1);
            assert!(soft.all_passed());
            assert_eq!(soft.assertion_count(), 0);
        }
    }

    mod assertion_failure {
        use super::*;

        #[test]
        fn test_display_with_location() {
            let failure = AssertionFailure::new("expected 30, got 20", 0).with_location("cart total");
            assert_eq!(failure.to_string(), "[cart total] expected 30, got 20");
            assert_eq!(
                AssertionFailure::new("bare", 1).to_string(),
                "bare"
            );
        }
    }
}

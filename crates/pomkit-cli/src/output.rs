//! Output formatting and journey reporting

use console::{style, Style, Term};
use pomkit::{ScenarioOutcome, ScenarioReport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output format for listings and journey results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Status lines on stderr; machine output goes to stdout
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn prefix(&self, glyph: &str, plain: &str, paint: Style) -> String {
        if self.use_color {
            paint.bold().apply_to(glyph).to_string()
        } else {
            plain.to_string()
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("✓", "PASS", Style::new().green());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = self.prefix("✗", "FAIL", Style::new().red());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("⚠", "WARN", Style::new().yellow());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("ℹ", "INFO", Style::new().blue());
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print one finished journey, with its soft failures when it failed
    pub fn journey(&self, report: &ScenarioReport) {
        let line = journey_line(report);
        match report.outcome {
            ScenarioOutcome::Passed => self.success(&line),
            ScenarioOutcome::Failed { ref error } => {
                self.failure(&format!("{line}: {error}"));
                for (i, failure) in report.soft_failures.iter().enumerate() {
                    let _ = self.term.write_line(&format!("    {}. {failure}", i + 1));
                }
            }
            ScenarioOutcome::TimedOut { timeout_ms } => {
                self.failure(&format!("{line}: timed out after {timeout_ms}ms"));
            }
        }
    }

    /// Print the run summary
    pub fn summary(&self, passed: usize, failed: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        let total = passed + failed;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            let _ = self.term.write_line(&format!(
                "{status} {total} journeys in {duration_secs:.2}s ({} passed, {} failed)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!(
                "{status} {total} journeys in {duration_secs:.2}s ({passed} passed, {failed} failed)"
            ));
        }
    }
}

/// `name [target / env] in 1.23s`
#[must_use]
pub fn journey_line(report: &ScenarioReport) -> String {
    format!(
        "{} [{} / {}] in {:.2}s",
        report.name,
        report.target,
        report.env,
        report.duration.as_secs_f64()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_plain_prefixes_without_color() {
        let reporter = ProgressReporter::new(false, false);
        assert_eq!(reporter.prefix("✓", "PASS", Style::new().green()), "PASS");
    }

    #[test]
    fn test_colored_prefix_keeps_glyph() {
        let reporter = ProgressReporter::new(true, false);
        assert!(reporter
            .prefix("✗", "FAIL", Style::new().red())
            .contains('✗'));
    }

    #[test]
    fn test_quiet_reporter_is_silent_but_safe() {
        let reporter = ProgressReporter::new(false, true);
        reporter.success("hidden");
        reporter.info("hidden");
        reporter.summary(3, 0, Duration::from_millis(1200));
        reporter.failure("shown");
    }
}

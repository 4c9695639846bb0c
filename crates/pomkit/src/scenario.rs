//! Scenario runner.
//!
//! A [`Scenario`] owns one browsing context for the duration of its body. The
//! context is closed after the body returns, fails or exceeds the scenario
//! ceiling, and soft-assertion failures recorded along the way are folded into
//! the final [`ScenarioReport`].
//!
//! ## Example
//!
//! ```rust,ignore
//! let scenario = Scenario::new("checkout", "demoblaze", config.clone());
//! let report = scenario
//!     .run(driver, |actions| async move {
//!         let cart = CartPage::new(actions, &config);
//!         cart.open().await?;
//!         cart.verify_total_matches_items().await
//!     })
//!     .await;
//! println!("{report}");
//! report.into_result()?;
//! ```

use crate::actions::PageActions;
use crate::artifacts::ArtifactStore;
use crate::assertion::AssertionFailure;
use crate::config::{EnvKey, SuiteConfig};
use crate::driver::BrowserDriver;
use crate::result::{PomError, PomResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Body succeeded and no soft assertion failed
    Passed,
    /// Body returned an error, or soft assertions failed
    Failed {
        /// Rendered cause
        error: String,
    },
    /// Scenario ceiling elapsed before the body finished
    TimedOut {
        /// Ceiling in milliseconds
        timeout_ms: u64,
    },
}

impl ScenarioOutcome {
    /// Check if the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one scenario run
#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Run identifier
    pub id: Uuid,
    /// Scenario name
    pub name: String,
    /// Site or journey the scenario exercised
    pub target: String,
    /// Environment the run targeted
    pub env: EnvKey,
    /// How the run ended
    pub outcome: ScenarioOutcome,
    /// Wall-clock time including cleanup
    pub duration: Duration,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Every soft assertion that failed, in recording order
    pub soft_failures: Vec<AssertionFailure>,
    #[serde(skip)]
    failure: Option<PomError>,
}

impl ScenarioReport {
    /// Check if the scenario passed
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.outcome.is_passed()
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> PomResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The error that failed the run, if any.
    ///
    /// Body errors come back unchanged; a run that only failed soft
    /// assertions yields [`PomError::SoftAssertions`].
    pub fn into_result(self) -> PomResult<()> {
        self.failure.map_or(Ok(()), Err)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = match self.outcome {
            ScenarioOutcome::Passed => "PASS",
            ScenarioOutcome::Failed { .. } => "FAIL",
            ScenarioOutcome::TimedOut { .. } => "TIMEOUT",
        };
        write!(
            f,
            "{verdict} {} [{} / {}] in {:.2}s",
            self.name,
            self.target,
            self.env.as_str(),
            self.duration.as_secs_f64()
        )?;
        match &self.outcome {
            ScenarioOutcome::Passed => {}
            ScenarioOutcome::Failed { error } => write!(f, "\n  {error}")?,
            ScenarioOutcome::TimedOut { timeout_ms } => {
                write!(f, "\n  exceeded the {timeout_ms}ms scenario ceiling")?;
            }
        }
        for (i, failure) in self.soft_failures.iter().enumerate() {
            write!(f, "\n  {}. {failure}", i + 1)?;
        }
        Ok(())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A named journey run against one browsing context
#[derive(Debug, Clone)]
pub struct Scenario {
    name: String,
    target: String,
    config: SuiteConfig,
}

impl Scenario {
    /// Create a scenario
    #[must_use]
    pub fn new(name: impl Into<String>, target: impl Into<String>, config: SuiteConfig) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            config,
        }
    }

    /// Scenario name, also used in artifact names
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Site or journey under test
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Configuration the scenario runs with
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Report for a run whose browsing context never came up
    #[must_use]
    pub fn not_started(&self, error: PomError) -> ScenarioReport {
        warn!(scenario = %self.name, target = %self.target, %error, "scenario not started");
        ScenarioReport {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            target: self.target.clone(),
            env: self.config.env,
            outcome: ScenarioOutcome::Failed {
                error: error.to_string(),
            },
            duration: Duration::ZERO,
            started_at: Utc::now(),
            soft_failures: Vec::new(),
            failure: Some(error),
        }
    }

    /// Run `body` against `driver`.
    ///
    /// The browsing context is closed afterwards whatever the body did, and
    /// a close failure is logged rather than reported.
    pub async fn run<F, Fut>(&self, driver: Arc<dyn BrowserDriver>, body: F) -> ScenarioReport
    where
        F: FnOnce(PageActions) -> Fut,
        Fut: Future<Output = PomResult<()>>,
    {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(scenario = %self.name, target = %self.target, %id, "scenario start");

        let actions = PageActions::new(Arc::clone(&driver), self.config.timeouts).with_artifacts(
            ArtifactStore::new(&self.config.artifact_dir),
            self.name.clone(),
            self.config.env,
        );
        let ceiling = self.config.timeouts.scenario();
        let result = match tokio::time::timeout(ceiling, body(actions.clone())).await {
            Ok(result) => result,
            Err(_) => Err(PomError::ScenarioTimeout {
                scenario: self.name.clone(),
                timeout_ms: millis(ceiling),
            }),
        };

        if let Err(err) = driver.close().await {
            warn!(scenario = %self.name, error = %err, "closing browsing context failed");
        }

        let soft = actions.soft_assertions();
        let soft_failures = soft.failures().to_vec();
        let (outcome, failure) = match result {
            Ok(()) => match soft.verify() {
                Ok(()) => (ScenarioOutcome::Passed, None),
                Err(err) => (
                    ScenarioOutcome::Failed {
                        error: format!("{} soft assertion(s) failed", soft_failures.len()),
                    },
                    Some(err),
                ),
            },
            Err(err @ PomError::ScenarioTimeout { .. }) => (
                ScenarioOutcome::TimedOut {
                    timeout_ms: millis(ceiling),
                },
                Some(err),
            ),
            Err(err) => (
                ScenarioOutcome::Failed {
                    error: err.to_string(),
                },
                Some(err),
            ),
        };

        let duration = clock.elapsed();
        info!(
            scenario = %self.name,
            passed = outcome.is_passed(),
            soft_failures = soft_failures.len(),
            duration_ms = millis(duration),
            "scenario finish"
        );
        ScenarioReport {
            id,
            name: self.name.clone(),
            target: self.target.clone(),
            env: self.config.env,
            outcome,
            duration,
            started_at,
            soft_failures,
            failure,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::assertion::AssertionPolicy;
    use crate::config::Timeouts;
    use crate::mock::sites::DemoblazeSim;
    use crate::sites::demoblaze::CartPage;

    fn config(dir: &std::path::Path) -> SuiteConfig {
        let (_, mut config) = DemoblazeSim::new().actions();
        config.artifact_dir = dir.to_path_buf();
        config
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_passing_scenario_closes_context() {
            let sim = DemoblazeSim::new();
            sim.put_in_cart("Nexus 6");
            let dir = tempfile::tempdir().unwrap();
            let config = config(dir.path());
            let scenario = Scenario::new("cart total", "demoblaze", config.clone());

            let report = scenario
                .run(Arc::new(sim.browser().clone()), |actions| async move {
                    let cart = CartPage::new(actions, &config);
                    cart.open().await?;
                    cart.verify_total_matches_items().await
                })
                .await;

            assert!(report.passed(), "{report}");
            assert!(sim.browser().is_closed());
            assert!(report.to_string().starts_with("PASS cart total [demoblaze / dev]"));
            report.into_result().unwrap();
        }

        #[tokio::test]
        async fn test_body_error_is_kept_and_context_closed() {
            let sim = DemoblazeSim::new();
            let dir = tempfile::tempdir().unwrap();
            let config = config(dir.path());
            let scenario = Scenario::new("remove ghost", "demoblaze", config.clone());

            let report = scenario
                .run(Arc::new(sim.browser().clone()), |actions| async move {
                    let cart = CartPage::new(actions, &config);
                    cart.open().await?;
                    cart.remove_item("Ghost phone").await
                })
                .await;

            assert!(sim.browser().is_closed());
            assert!(matches!(report.outcome, ScenarioOutcome::Failed { ref error } if error.contains("delete 'Ghost phone'")));
            assert!(matches!(report.into_result(), Err(PomError::ActionTimeout { .. })));
        }

        #[tokio::test]
        async fn test_ceiling_aborts_body() {
            let sim = DemoblazeSim::new();
            let dir = tempfile::tempdir().unwrap();
            let mut config = config(dir.path());
            config.timeouts = Timeouts {
                scenario_ms: 40,
                ..config.timeouts
            };
            let scenario = Scenario::new("slow", "demoblaze", config);

            let report = scenario
                .run(Arc::new(sim.browser().clone()), |_| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                })
                .await;

            assert_eq!(report.outcome, ScenarioOutcome::TimedOut { timeout_ms: 40 });
            assert!(sim.browser().is_closed());
            assert!(report.to_string().contains("40ms scenario ceiling"));
            assert!(matches!(
                report.into_result(),
                Err(PomError::ScenarioTimeout { ref scenario, .. }) if scenario == "slow"
            ));
        }
    }

    mod report_tests {
        use super::*;

        #[tokio::test]
        async fn test_soft_failures_fold_into_report() {
            let sim = DemoblazeSim::new();
            sim.put_in_cart("Nexus 6");
            sim.put_in_cart("Sony xperia z5");
            let dir = tempfile::tempdir().unwrap();
            let config = config(dir.path());
            let scenario = Scenario::new("wrong prices", "demoblaze", config.clone());

            let report = scenario
                .run(Arc::new(sim.browser().clone()), |actions| async move {
                    let cart = CartPage::new(actions, &config).with_policy(AssertionPolicy::Soft);
                    cart.open().await?;
                    cart.verify_product_price("Nexus 6", 600).await?;
                    cart.verify_product_price("Sony xperia z5", 300).await?;
                    cart.verify_total_amount(970).await
                })
                .await;

            assert!(!report.passed());
            assert_eq!(report.soft_failures.len(), 2);
            let rendered = report.to_string();
            assert!(rendered.starts_with("FAIL wrong prices"));
            assert!(rendered.contains("2 soft assertion(s) failed"));
            assert!(rendered.contains("1. [price of Nexus 6] price of Nexus 6: expected 600, got 650"));
            assert!(rendered.contains("2. [price of Sony xperia z5]"));

            let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
            assert_eq!(json["outcome"]["status"], "failed");
            assert_eq!(json["env"], "dev");
            assert_eq!(json["soft_failures"].as_array().unwrap().len(), 2);

            assert!(matches!(
                report.into_result(),
                Err(PomError::SoftAssertions { count: 2, .. })
            ));
        }

        #[test]
        fn test_not_started_keeps_launch_error() {
            let dir = tempfile::tempdir().unwrap();
            let scenario = Scenario::new("checkout", "demoblaze", config(dir.path()));
            let report = scenario.not_started(PomError::BrowserLaunch {
                message: "no chromium".to_string(),
            });

            assert!(!report.passed());
            assert_eq!(report.duration, Duration::ZERO);
            assert!(report.to_string().contains("Failed to launch browser: no chromium"));
            assert!(matches!(report.into_result(), Err(PomError::BrowserLaunch { .. })));
        }

        #[test]
        fn test_outcome_serializes_with_status_tag() {
            let json = serde_json::to_string(&ScenarioOutcome::TimedOut { timeout_ms: 9 }).unwrap();
            assert_eq!(json, r#"{"status":"timed_out","timeout_ms":9}"#);
            assert!(ScenarioOutcome::Passed.is_passed());
        }
    }
}

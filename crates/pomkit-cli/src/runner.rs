//! Journey runner

use crate::error::{CliError, CliResult};
use crate::journeys::Journey;
use crate::output::ProgressReporter;
use futures::stream::{self, StreamExt};
use pomkit::{BrowserDriver, PomResult, Scenario, ScenarioReport, SuiteConfig};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Where journeys get their browser from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// In-memory site simulations
    Simulated,
    /// A real Chromium per journey
    Live,
}

/// Command-line overrides applied on top of the resolved configuration
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Screenshot directory
    pub artifact_dir: Option<PathBuf>,
    /// Concurrent journeys
    pub workers: Option<usize>,
    /// Fixture directory
    pub fixtures_dir: Option<PathBuf>,
    /// Show the browser window
    pub headed: bool,
}

impl RunOverrides {
    /// Apply to `config`
    #[must_use]
    pub fn apply(&self, mut config: SuiteConfig) -> SuiteConfig {
        if let Some(ref dir) = self.artifact_dir {
            config.artifact_dir.clone_from(dir);
        }
        if let Some(ref dir) = self.fixtures_dir {
            config.fixtures_dir = Some(dir.clone());
        }
        if let Some(workers) = self.workers.filter(|w| *w > 0) {
            config.workers = workers;
        }
        if self.headed {
            config.headless = false;
        }
        config
    }
}

/// Aggregated journey reports
#[derive(Debug, Default)]
pub struct JourneyResults {
    /// Reports in the order journeys were requested
    pub reports: Vec<ScenarioReport>,
    /// Wall-clock time of the whole run
    pub duration: Duration,
}

impl JourneyResults {
    /// Number of passed journeys
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    /// Number of failed journeys
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Check if every journey passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(ScenarioReport::passed)
    }

    /// `Err` naming the failed journeys when any failed
    pub fn into_result(self) -> CliResult<Self> {
        if self.all_passed() {
            return Ok(self);
        }
        let names: Vec<&str> = self
            .reports
            .iter()
            .filter(|r| !r.passed())
            .map(|r| r.name.as_str())
            .collect();
        Err(CliError::journey_failed(format!(
            "{} of {} journeys failed ({})",
            names.len(),
            self.reports.len(),
            names.join(", ")
        )))
    }
}

/// Runs journeys as scenarios, a bounded number at a time
#[derive(Debug)]
pub struct JourneyRunner {
    mode: RunMode,
    config: SuiteConfig,
    overrides: RunOverrides,
    reporter: ProgressReporter,
}

impl JourneyRunner {
    /// Create a runner; `config` is used as is for live runs, simulated runs
    /// take their hosts from the simulation
    #[must_use]
    pub fn new(
        mode: RunMode,
        config: SuiteConfig,
        overrides: RunOverrides,
        reporter: ProgressReporter,
    ) -> Self {
        Self {
            mode,
            config: overrides.apply(config),
            overrides,
            reporter,
        }
    }

    /// Journeys at once
    #[must_use]
    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Run `journeys` (every journey when empty), reporting each as it ends.
    ///
    /// A journey whose browser fails to come up is reported as failed; the
    /// rest still run.
    pub async fn run(&self, journeys: &[Journey]) -> JourneyResults {
        self.run_with(journeys, |journey| self.driver_for(journey))
            .await
    }

    async fn run_with<F, Fut>(&self, journeys: &[Journey], driver_for: F) -> JourneyResults
    where
        F: Fn(Journey) -> Fut,
        Fut: Future<Output = PomResult<(Arc<dyn BrowserDriver>, SuiteConfig)>>,
    {
        let plan: Vec<Journey> = if journeys.is_empty() {
            Journey::ALL.to_vec()
        } else {
            journeys.to_vec()
        };
        info!(
            journeys = plan.len(),
            workers = self.workers(),
            mode = ?self.mode,
            "journey run start"
        );
        self.reporter.header(&format!(
            "Running {} journey(s) {}",
            plan.len(),
            match self.mode {
                RunMode::Simulated => "against simulations",
                RunMode::Live => "in chromium",
            }
        ));

        let clock = Instant::now();
        let reports: Vec<ScenarioReport> = stream::iter(plan)
            .map(|journey| self.run_one(journey, &driver_for))
            .buffered(self.workers())
            .collect()
            .await;

        let results = JourneyResults {
            reports,
            duration: clock.elapsed(),
        };
        self.reporter
            .summary(results.passed(), results.failed(), results.duration);
        results
    }

    async fn run_one<F, Fut>(&self, journey: Journey, driver_for: &F) -> ScenarioReport
    where
        F: Fn(Journey) -> Fut,
        Fut: Future<Output = PomResult<(Arc<dyn BrowserDriver>, SuiteConfig)>>,
    {
        let report = match driver_for(journey).await {
            Ok((driver, config)) => {
                debug!(journey = %journey, url = ?journey_base(&config, journey), "journey driver ready");
                let body_config = config.clone();
                Scenario::new(journey.name(), journey.site(), config)
                    .run(driver, move |actions| journey.run(actions, body_config))
                    .await
            }
            Err(err) => Scenario::new(journey.name(), journey.site(), self.config.clone())
                .not_started(err),
        };
        self.reporter.journey(&report);
        report
    }

    async fn driver_for(&self, journey: Journey) -> PomResult<(Arc<dyn BrowserDriver>, SuiteConfig)> {
        match self.mode {
            RunMode::Simulated => {
                let (driver, mut config) = journey.simulation();
                config.env = self.config.env;
                config.fixtures_dir.clone_from(&self.config.fixtures_dir);
                Ok((driver, self.overrides.apply(config)))
            }
            RunMode::Live => launch(&self.config).await.map(|driver| (driver, self.config.clone())),
        }
    }
}

fn journey_base(config: &SuiteConfig, journey: Journey) -> &str {
    match journey.site() {
        "demoblaze" => &config.sites.demoblaze,
        "demoqa" => &config.sites.demoqa,
        _ => &config.sites.saucedemo,
    }
}

#[cfg(feature = "browser")]
async fn launch(config: &SuiteConfig) -> PomResult<Arc<dyn BrowserDriver>> {
    let driver = pomkit::ChromiumDriver::launch(&config.driver_config()).await?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn launch(_config: &SuiteConfig) -> PomResult<Arc<dyn BrowserDriver>> {
    Err(pomkit::PomError::BrowserLaunch {
        message: "live journeys need a chromium build; rebuild with --features browser or pass --sim"
            .to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pomkit::PomError;

    fn quiet() -> ProgressReporter {
        ProgressReporter::new(false, true)
    }

    mod override_tests {
        use super::*;

        #[test]
        fn test_overrides_replace_only_what_is_set() {
            let base = SuiteConfig::default();
            let unchanged = RunOverrides::default().apply(base.clone());
            assert_eq!(unchanged.artifact_dir, base.artifact_dir);
            assert_eq!(unchanged.workers, base.workers);

            let overrides = RunOverrides {
                artifact_dir: Some(PathBuf::from("/tmp/shots")),
                workers: Some(3),
                fixtures_dir: Some(PathBuf::from("data")),
                headed: true,
            };
            let config = overrides.apply(base);
            assert_eq!(config.artifact_dir, PathBuf::from("/tmp/shots"));
            assert_eq!(config.workers, 3);
            assert_eq!(config.fixtures_dir, Some(PathBuf::from("data")));
            assert!(!config.headless);
        }

        #[test]
        fn test_zero_workers_is_ignored() {
            let base = SuiteConfig::default();
            let config = RunOverrides {
                workers: Some(0),
                ..RunOverrides::default()
            }
            .apply(base.clone());
            assert_eq!(config.workers, base.workers);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_simulated_run_keeps_requested_order() {
            let dir = tempfile::tempdir().unwrap();
            let overrides = RunOverrides {
                artifact_dir: Some(dir.path().to_path_buf()),
                workers: Some(2),
                ..RunOverrides::default()
            };
            let runner =
                JourneyRunner::new(RunMode::Simulated, SuiteConfig::default(), overrides, quiet());
            assert_eq!(runner.workers(), 2);

            let results = runner
                .run(&[Journey::Shopping, Journey::Buttons, Journey::Login])
                .await;
            let names: Vec<&str> = results.reports.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["shopping", "buttons", "login"]);
            assert_eq!(results.passed(), 3);
            assert!(results.into_result().is_ok());
        }

        #[tokio::test]
        async fn test_empty_selection_runs_everything() {
            let dir = tempfile::tempdir().unwrap();
            let overrides = RunOverrides {
                artifact_dir: Some(dir.path().to_path_buf()),
                ..RunOverrides::default()
            };
            let runner =
                JourneyRunner::new(RunMode::Simulated, SuiteConfig::default(), overrides, quiet());
            let results = runner.run(&[]).await;
            assert_eq!(results.reports.len(), Journey::ALL.len());
            assert!(results.all_passed());
        }

        #[tokio::test]
        async fn test_launch_failure_keeps_other_reports() {
            let dir = tempfile::tempdir().unwrap();
            let overrides = RunOverrides {
                artifact_dir: Some(dir.path().to_path_buf()),
                workers: Some(2),
                ..RunOverrides::default()
            };
            let runner = JourneyRunner::new(
                RunMode::Simulated,
                SuiteConfig::default(),
                overrides.clone(),
                quiet(),
            );

            let results = runner
                .run_with(
                    &[Journey::Shopping, Journey::Login, Journey::Buttons],
                    |journey| {
                        let overrides = overrides.clone();
                        async move {
                            if journey == Journey::Login {
                                return Err(PomError::BrowserLaunch {
                                    message: "chromium exited".to_string(),
                                });
                            }
                            let (driver, config) = journey.simulation();
                            Ok((driver, overrides.apply(config)))
                        }
                    },
                )
                .await;

            let names: Vec<&str> = results.reports.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["shopping", "login", "buttons"]);
            assert_eq!(results.passed(), 2);
            assert_eq!(results.failed(), 1);
            assert!(results.reports[1].to_string().contains("chromium exited"));
            let err = results.into_result().unwrap_err();
            assert!(err.to_string().contains("1 of 3 journeys failed (login)"));
        }

        #[cfg(not(feature = "browser"))]
        #[tokio::test]
        async fn test_live_run_needs_browser_feature() {
            let runner = JourneyRunner::new(
                RunMode::Live,
                SuiteConfig::default(),
                RunOverrides::default(),
                quiet(),
            );
            let results = runner.run(&[Journey::Checkout, Journey::Shopping]).await;
            assert_eq!(results.reports.len(), 2);
            assert_eq!(results.failed(), 2);
            assert!(results.reports[0].to_string().contains("--features browser"));
        }
    }

    mod result_tests {
        use super::*;

        #[test]
        fn test_empty_results_pass() {
            let results = JourneyResults::default();
            assert_eq!(results.passed(), 0);
            assert_eq!(results.failed(), 0);
            assert!(results.into_result().is_ok());
        }
    }
}

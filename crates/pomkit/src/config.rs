//! Suite configuration and environment selection.
//!
//! Configuration is an explicit value threaded into page-object construction.
//! It is resolved in layers: built-in defaults, then an optional YAML file,
//! then environment variables. Environment lookup goes through a closure so
//! resolution can be tested without touching the process environment.

use crate::driver::DriverConfig;
use crate::result::{PomError, PomResult};
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Every accepted environment key
pub const ENV_KEYS: [&str; 3] = ["dev", "stg", "prod"];

/// Environment a run targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EnvKey {
    /// Development (default)
    #[default]
    Dev,
    /// Staging
    Stg,
    /// Production
    Prod,
}

impl EnvKey {
    /// Parse a key, falling back to [`EnvKey::Dev`] with a warning when the
    /// value is missing or not one of [`ENV_KEYS`].
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("dev") => Self::Dev,
            Some("stg") => Self::Stg,
            Some("prod") => Self::Prod,
            other => {
                tracing::warn!(
                    value = ?other,
                    valid = %ENV_KEYS.join(", "),
                    "environment key missing or invalid, using 'dev'"
                );
                Self::Dev
            }
        }
    }

    /// Lowercase key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Stg => "stg",
            Self::Prod => "prod",
        }
    }
}

impl From<String> for EnvKey {
    fn from(raw: String) -> Self {
        Self::parse_or_default(Some(&raw))
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URLs of the applications under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteUrls {
    /// E-commerce demo
    pub demoblaze: String,
    /// Widget showcase
    pub demoqa: String,
    /// Shopping demo
    pub saucedemo: String,
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self {
            demoblaze: "https://www.demoblaze.com".to_string(),
            demoqa: "https://demoqa.com".to_string(),
            saucedemo: "https://www.saucedemo.com".to_string(),
        }
    }
}

/// Login for the e-commerce demo
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Wait budgets, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Actionability and visibility waits
    pub action_ms: u64,
    /// Page loads
    pub navigation_ms: u64,
    /// Whole-scenario ceiling
    pub scenario_ms: u64,
    /// Delay between polls
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: 30_000,
            navigation_ms: 60_000,
            scenario_ms: 60_000,
            poll_interval_ms: 50,
        }
    }
}

impl Timeouts {
    /// Uniform small budgets, mostly for tests against the mock browser
    #[must_use]
    pub const fn uniform(budget_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            action_ms: budget_ms,
            navigation_ms: budget_ms,
            scenario_ms: budget_ms.saturating_mul(20),
            poll_interval_ms,
        }
    }

    /// Action budget
    #[must_use]
    pub const fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    /// Navigation budget
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Scenario ceiling
    #[must_use]
    pub const fn scenario(&self) -> Duration {
        Duration::from_millis(self.scenario_ms)
    }

    /// Wait options for action-level polling
    #[must_use]
    pub const fn action_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.action_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

/// Resolved configuration for one suite run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Selected environment
    pub env: EnvKey,
    /// Application base URLs
    pub sites: SiteUrls,
    /// E-commerce demo login
    pub credentials: Credentials,
    /// Run the browser headless
    pub headless: bool,
    /// Delay after every browser action, in milliseconds
    pub slow_mo_ms: u64,
    /// Parallel scenarios
    pub workers: usize,
    /// Wait budgets
    pub timeouts: Timeouts,
    /// Screenshot directory
    pub artifact_dir: PathBuf,
    /// Root of environment-keyed fixture files; built-in data when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            env: EnvKey::Dev,
            sites: SiteUrls::default(),
            credentials: Credentials::default(),
            headless: false,
            slow_mo_ms: 0,
            workers: 4,
            timeouts: Timeouts::default(),
            artifact_dir: PathBuf::from("test-results"),
            fixtures_dir: None,
        }
    }
}

fn parse_env_value<T: std::str::FromStr>(name: &str, raw: &str) -> PomResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| PomError::config(format!("{name}={raw:?} is not a valid value")))
}

fn parse_bool(name: &str, raw: &str) -> PomResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(PomError::config(format!("{name}={raw:?} is not a boolean"))),
    }
}

impl SuiteConfig {
    /// Parse a YAML document; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns a YAML error for malformed documents
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML file
    ///
    /// # Errors
    ///
    /// Returns [`PomError::Config`] naming the path when the file cannot be read
    /// or parsed
    pub fn from_file(path: &Path) -> PomResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PomError::config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
            .map_err(|e| PomError::config(format!("{}: {e}", path.display())))
    }

    /// Overlay environment variables read through `lookup`
    ///
    /// # Errors
    ///
    /// Returns [`PomError::Config`] for unparsable numeric or boolean values
    pub fn apply_env<F>(mut self, lookup: F) -> PomResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_raw = lookup("TEST_ENV").or_else(|| lookup("test_env"));
        if env_raw.is_some() {
            self.env = EnvKey::parse_or_default(env_raw.as_deref());
        }
        if let Some(url) = lookup("BASE_URL") {
            self.sites.demoqa = url;
        }
        if let Some(url) = lookup("DEMOBLAZE_BASE_URL") {
            self.sites.demoblaze = url;
        }
        if let Some(user) = lookup("DEMOBLAZE_USERNAME") {
            self.credentials.username = user;
        }
        if let Some(password) = lookup("DEMOBLAZE_PASSWORD") {
            self.credentials.password = password;
        }
        if let Some(raw) = lookup("HEADLESS") {
            self.headless = parse_bool("HEADLESS", &raw)?;
        }
        if let Some(raw) = lookup("SLOW_MO") {
            self.slow_mo_ms = parse_env_value("SLOW_MO", &raw)?;
        }
        if let Some(raw) = lookup("WORKERS") {
            let workers: usize = parse_env_value("WORKERS", &raw)?;
            if workers > 0 {
                self.workers = workers;
            }
        }
        if let Some(dir) = lookup("ARTIFACT_DIR") {
            self.artifact_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("FIXTURES_DIR") {
            self.fixtures_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Defaults, then `file` if given, then environment variables
    ///
    /// # Errors
    ///
    /// Propagates file and environment parsing errors
    pub fn resolve<F>(file: Option<&Path>, lookup: F) -> PomResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.apply_env(lookup)?;
        tracing::debug!(env = %config.env, headless = config.headless, "configuration resolved");
        Ok(config)
    }

    /// [`SuiteConfig::resolve`] against the process environment
    ///
    /// # Errors
    ///
    /// Propagates file and environment parsing errors
    pub fn from_process_env(file: Option<&Path>) -> PomResult<Self> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Browser launch settings derived from this configuration
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig::new()
            .headless(self.headless)
            .no_sandbox()
            .slow_mo(Duration::from_millis(self.slow_mo_ms))
    }

    /// Render as YAML with the password masked
    ///
    /// # Errors
    ///
    /// Returns a YAML error if serialization fails
    pub fn to_redacted_yaml(&self) -> PomResult<String> {
        let mut shown = self.clone();
        if !shown.credentials.password.is_empty() {
            shown.credentials.password = "***".to_string();
        }
        Ok(serde_yaml_ng::to_string(&shown)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod env_key_tests {
        use super::*;

        #[test]
        fn test_valid_keys() {
            assert_eq!(EnvKey::parse_or_default(Some("stg")), EnvKey::Stg);
            assert_eq!(EnvKey::parse_or_default(Some(" PROD ")), EnvKey::Prod);
            assert_eq!(EnvKey::parse_or_default(Some("dev")), EnvKey::Dev);
        }

        #[test]
        fn test_invalid_or_missing_falls_back_to_dev() {
            assert_eq!(EnvKey::parse_or_default(Some("qa")), EnvKey::Dev);
            assert_eq!(EnvKey::parse_or_default(None), EnvKey::Dev);
        }

        #[test]
        fn test_yaml_invalid_key_falls_back() {
            let config = SuiteConfig::from_yaml_str("env: nightly\n").unwrap();
            assert_eq!(config.env, EnvKey::Dev);
        }
    }

    mod layering_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = SuiteConfig::default();
            assert_eq!(config.timeouts.action(), Duration::from_secs(30));
            assert_eq!(config.timeouts.navigation(), Duration::from_secs(60));
            assert_eq!(config.timeouts.scenario(), Duration::from_secs(60));
            assert_eq!(config.artifact_dir, PathBuf::from("test-results"));
            assert_eq!(config.workers, 4);
            assert_eq!(config.sites.demoblaze, "https://www.demoblaze.com");
            assert_eq!(config.fixtures_dir, None);
        }

        #[test]
        fn test_uniform_ceiling_saturates() {
            let timeouts = Timeouts::uniform(200, 5);
            assert_eq!(timeouts.scenario_ms, 4_000);
            assert_eq!(Timeouts::uniform(u64::MAX, 5).scenario_ms, u64::MAX);
        }

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let yaml = "env: stg\ntimeouts:\n  action_ms: 5000\nsites:\n  demoqa: http://localhost:3000\n";
            let config = SuiteConfig::from_yaml_str(yaml).unwrap();
            assert_eq!(config.env, EnvKey::Stg);
            assert_eq!(config.timeouts.action_ms, 5000);
            assert_eq!(config.timeouts.navigation_ms, 60_000);
            assert_eq!(config.sites.demoqa, "http://localhost:3000");
            assert_eq!(config.sites.saucedemo, "https://www.saucedemo.com");
        }

        #[test]
        fn test_env_overrides_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "env: stg\nheadless: false\nworkers: 2\n").unwrap();

            let lookup = lookup_from(&[
                ("TEST_ENV", "prod"),
                ("HEADLESS", "true"),
                ("DEMOBLAZE_USERNAME", "alice"),
                ("DEMOBLAZE_PASSWORD", "s3cret"),
                ("SLOW_MO", "250"),
                ("ARTIFACT_DIR", "out/shots"),
                ("FIXTURES_DIR", "data"),
            ]);
            let config = SuiteConfig::resolve(Some(&path), lookup).unwrap();
            assert_eq!(config.env, EnvKey::Prod);
            assert!(config.headless);
            assert_eq!(config.workers, 2);
            assert_eq!(config.credentials.username, "alice");
            assert_eq!(config.slow_mo_ms, 250);
            assert_eq!(config.artifact_dir, PathBuf::from("out/shots"));
            assert_eq!(config.fixtures_dir, Some(PathBuf::from("data")));
            assert_eq!(
                config.driver_config().slow_mo,
                Duration::from_millis(250)
            );
        }

        #[test]
        fn test_bad_number_is_config_error() {
            let err = SuiteConfig::default()
                .apply_env(lookup_from(&[("WORKERS", "many")]))
                .unwrap_err();
            assert!(matches!(err, PomError::Config { .. }));
            assert!(err.to_string().contains("WORKERS"));
        }

        #[test]
        fn test_missing_file_names_path() {
            let err = SuiteConfig::from_file(Path::new("/no/such/suite.yaml")).unwrap_err();
            assert!(err.to_string().contains("/no/such/suite.yaml"));
        }
    }

    mod redaction_tests {
        use super::*;

        #[test]
        fn test_password_never_rendered() {
            let mut config = SuiteConfig::default();
            config.credentials.password = "hunter2".to_string();
            let yaml = config.to_redacted_yaml().unwrap();
            assert!(!yaml.contains("hunter2"));
            assert!(yaml.contains("***"));
            assert!(!format!("{:?}", config.credentials).contains("hunter2"));
        }
    }
}

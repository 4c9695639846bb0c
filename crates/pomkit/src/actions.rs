//! Resilient action primitives shared by every page object.
//!
//! [`PageActions`] is the only way page objects touch the browser. Each
//! primitive waits for its precondition within a bounded budget, then
//! delegates to the [`BrowserDriver`]. A timeout names the operation, the
//! locator and the budget that was exceeded.

use crate::artifacts::{ArtifactName, ArtifactStore};
use crate::assertion::{AssertionFailure, AssertionPolicy, AssertionResult, SoftAssertions};
use crate::config::{EnvKey, Timeouts};
use crate::dialog::{Dialog, DialogPolicy};
use crate::driver::{BoundingBox, BrowserDriver, ClickKind, ElementSnapshot, LoadState};
use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use crate::wait::{poll_until, Probe, WaitOptions, WaitOutcome};
use regex::Regex;
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Cloneable handle bundling the driver, wait budgets, artifact output and the
/// scenario's soft-assertion collector.
///
/// Clones share the collector, so every page object of a scenario reports
/// into the same list.
#[derive(Clone)]
pub struct PageActions {
    driver: Arc<dyn BrowserDriver>,
    timeouts: Timeouts,
    artifacts: ArtifactStore,
    scenario: String,
    env: EnvKey,
    soft: Arc<Mutex<SoftAssertions>>,
    pending_dialogs: Arc<Mutex<VecDeque<Dialog>>>,
}

impl fmt::Debug for PageActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageActions")
            .field("timeouts", &self.timeouts)
            .field("artifacts", &self.artifacts)
            .field("scenario", &self.scenario)
            .field("env", &self.env)
            .finish()
    }
}

impl PageActions {
    /// Create an action handle over `driver`
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>, timeouts: Timeouts) -> Self {
        Self {
            driver,
            timeouts,
            artifacts: ArtifactStore::default(),
            scenario: "adhoc".to_string(),
            env: EnvKey::Dev,
            soft: Arc::new(Mutex::new(SoftAssertions::new())),
            pending_dialogs: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Write screenshots to `store`, naming them after `scenario` and `env`
    #[must_use]
    pub fn with_artifacts(
        mut self,
        store: ArtifactStore,
        scenario: impl Into<String>,
        env: EnvKey,
    ) -> Self {
        self.artifacts = store;
        self.scenario = scenario.into();
        self.env = env;
        self
    }

    /// Wait budgets
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    fn wait_options(&self) -> WaitOptions {
        self.timeouts.action_wait()
    }

    fn action_timeout(&self, operation: &str, locator: &Locator, reason: String) -> PomError {
        PomError::ActionTimeout {
            operation: operation.to_string(),
            locator: locator.description(),
            timeout_ms: self.timeouts.action_ms,
            reason,
        }
    }

    async fn first(&self, locator: &Locator) -> PomResult<Option<ElementSnapshot>> {
        Ok(self.driver.query(locator).await?.into_iter().next())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Load `url` and wait for the DOM to be ready
    ///
    /// # Errors
    ///
    /// [`PomError::Navigation`] if the page does not load within the
    /// navigation budget
    pub async fn navigate(&self, url: &str) -> PomResult<()> {
        info!(url, "navigate");
        let budget = self.timeouts.navigation();
        let load = self
            .driver
            .navigate(url, LoadState::DomContentLoaded, budget);
        match tokio::time::timeout(budget, load).await {
            Ok(result) => result,
            Err(_) => Err(PomError::Navigation {
                url: url.to_string(),
                timeout_ms: self.timeouts.navigation_ms,
                message: "load state not reached".to_string(),
            }),
        }
    }

    /// URL of the current document
    pub async fn current_url(&self) -> PomResult<String> {
        self.driver.current_url().await
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Wait until the first match is visible, enabled and not moving.
    async fn wait_actionable(&self, operation: &str, locator: &Locator) -> PomResult<ElementSnapshot> {
        let last_bounds: Mutex<Option<Option<BoundingBox>>> = Mutex::new(None);
        let last_bounds = &last_bounds;
        let outcome = poll_until(self.wait_options(), operation, || async move {
            let Some(element) = self.first(locator).await? else {
                return Ok(Probe::Pending("no element matches".to_string()));
            };
            if !element.visible {
                return Ok(Probe::Pending("element is not visible".to_string()));
            }
            if !element.enabled {
                return Ok(Probe::Pending("element is disabled".to_string()));
            }
            let previous = last_bounds
                .lock()
                .map(|mut prev| prev.replace(element.bounds))
                .unwrap_or(None);
            if previous != Some(element.bounds) {
                return Ok(Probe::Pending("element is not stable".to_string()));
            }
            Ok(Probe::Ready(element))
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(element) => Ok(element),
            WaitOutcome::TimedOut { reason, .. } => {
                Err(self.action_timeout(operation, locator, reason))
            }
        }
    }

    async fn click_with(&self, locator: &Locator, kind: ClickKind) -> PomResult<()> {
        let operation = kind.to_string();
        debug!(operation = %operation, locator = %locator.description(), "action");
        let _ = self.wait_actionable(&operation, locator).await?;
        self.driver.click(locator, kind).await
    }

    /// Click once the element is actionable
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] if the element never becomes actionable
    pub async fn click(&self, locator: &Locator) -> PomResult<()> {
        self.click_with(locator, ClickKind::Single).await
    }

    /// Double-click once the element is actionable
    pub async fn double_click(&self, locator: &Locator) -> PomResult<()> {
        self.click_with(locator, ClickKind::Double).await
    }

    /// Right-click once the element is actionable
    pub async fn right_click(&self, locator: &Locator) -> PomResult<()> {
        self.click_with(locator, ClickKind::Right).await
    }

    /// Clear the field and type `text`, then confirm the value took
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] if the field never becomes actionable or
    /// never reports the typed value
    pub async fn fill(&self, locator: &Locator, text: &str) -> PomResult<()> {
        debug!(locator = %locator.description(), len = text.len(), "fill");
        let _ = self.wait_actionable("fill", locator).await?;
        self.driver.fill(locator, text).await?;
        let outcome = poll_until(self.wait_options(), "fill", || async move {
            let value = self
                .first(locator)
                .await?
                .and_then(|element| element.value)
                .unwrap_or_default();
            Ok(if value == text {
                Probe::Ready(())
            } else {
                Probe::Pending(format!("value is {value:?}"))
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(()) => Ok(()),
            WaitOutcome::TimedOut { reason, .. } => Err(self.action_timeout("fill", locator, reason)),
        }
    }

    /// Make sure a checkbox is checked; a checked box is left alone
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] if the box never becomes actionable or
    /// never reports checked
    pub async fn check(&self, locator: &Locator) -> PomResult<()> {
        debug!(locator = %locator.description(), "check");
        let element = self.wait_actionable("check", locator).await?;
        if element.checked == Some(true) {
            return Ok(());
        }
        self.driver.set_checked(locator, true).await?;
        let outcome = poll_until(self.wait_options(), "check", || async move {
            let checked = self.first(locator).await?.and_then(|e| e.checked);
            Ok(if checked == Some(true) {
                Probe::Ready(())
            } else {
                Probe::Pending("box is not checked".to_string())
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(()) => Ok(()),
            WaitOutcome::TimedOut { reason, .. } => {
                Err(self.action_timeout("check", locator, reason))
            }
        }
    }

    // ------------------------------------------------------------------
    // Waiting and reading
    // ------------------------------------------------------------------

    async fn wait_visibility(&self, locator: &Locator, want_visible: bool) -> PomResult<()> {
        let state = if want_visible { "visible" } else { "hidden" };
        let outcome = poll_until(self.wait_options(), state, || async move {
            let visible = self.first(locator).await?.is_some_and(|e| e.visible);
            Ok(if visible == want_visible {
                Probe::Ready(())
            } else {
                Probe::Pending(format!("not {state}"))
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(()) => Ok(()),
            WaitOutcome::TimedOut { .. } => Err(PomError::VisibilityTimeout {
                locator: locator.description(),
                state: state.to_string(),
                timeout_ms: self.timeouts.action_ms,
            }),
        }
    }

    /// Block until the first match is visible
    ///
    /// # Errors
    ///
    /// [`PomError::VisibilityTimeout`] when the budget runs out
    pub async fn wait_for_visible(&self, locator: &Locator) -> PomResult<()> {
        self.wait_visibility(locator, true).await
    }

    /// Block until nothing visible matches
    ///
    /// # Errors
    ///
    /// [`PomError::VisibilityTimeout`] when the budget runs out
    pub async fn wait_for_hidden(&self, locator: &Locator) -> PomResult<()> {
        self.wait_visibility(locator, false).await
    }

    /// Wait for at least one match to be attached, returning the first
    async fn attached(&self, operation: &str, locator: &Locator) -> PomResult<ElementSnapshot> {
        let outcome = poll_until(self.wait_options(), operation, || async move {
            Ok(match self.first(locator).await? {
                Some(element) => Probe::Ready(element),
                None => Probe::Pending("no element matches".to_string()),
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(element) => Ok(element),
            WaitOutcome::TimedOut { .. } => Err(PomError::NotFound {
                operation: operation.to_string(),
                locator: locator.description(),
            }),
        }
    }

    /// Trimmed text of the first match
    ///
    /// # Errors
    ///
    /// [`PomError::NotFound`] if nothing matches within the action budget
    pub async fn text(&self, locator: &Locator) -> PomResult<String> {
        let element = self.attached("text", locator).await?;
        Ok(element.text.trim().to_string())
    }

    /// Trimmed text of every current match, without waiting
    pub async fn all_texts(&self, locator: &Locator) -> PomResult<Vec<String>> {
        Ok(self
            .driver
            .query(locator)
            .await?
            .into_iter()
            .map(|e| e.text.trim().to_string())
            .collect())
    }

    /// Current value of the first matched form control
    ///
    /// # Errors
    ///
    /// [`PomError::NotFound`] if nothing matches within the action budget
    pub async fn input_value(&self, locator: &Locator) -> PomResult<String> {
        let element = self.attached("input_value", locator).await?;
        Ok(element.value.unwrap_or_default())
    }

    /// Number of current matches, without waiting
    pub async fn count(&self, locator: &Locator) -> PomResult<usize> {
        Ok(self.driver.query(locator).await?.len())
    }

    /// Whether the first current match is visible, without waiting
    pub async fn is_visible(&self, locator: &Locator) -> PomResult<bool> {
        Ok(self.first(locator).await?.is_some_and(|e| e.visible))
    }

    /// Wait until exactly `expected` elements match
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] carrying the last observed count
    pub async fn wait_for_count(&self, locator: &Locator, expected: usize) -> PomResult<()> {
        let outcome = poll_until(self.wait_options(), "wait_for_count", || async move {
            let count = self.count(locator).await?;
            Ok(if count == expected {
                Probe::Ready(())
            } else {
                Probe::Pending(format!("count is {count}, want {expected}"))
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(()) => Ok(()),
            WaitOutcome::TimedOut { reason, .. } => {
                Err(self.action_timeout("wait_for_count", locator, reason))
            }
        }
    }

    // ------------------------------------------------------------------
    // Screenshots and dialogs
    // ------------------------------------------------------------------

    /// Capture a full-page screenshot named after the scenario, environment
    /// and `target`.
    ///
    /// Never fails: capture or write errors are logged and yield `None`.
    pub async fn take_screenshot(&self, target: &str) -> Option<PathBuf> {
        let name = ArtifactName::new(self.scenario.clone(), self.env, target);
        match self.driver.screenshot(true).await {
            Ok(png) => self.artifacts.save_screenshot(&name, &png),
            Err(e) => {
                warn!(artifact = %name, error = %e, "screenshot capture failed");
                None
            }
        }
    }

    /// Accept every dialog opened from now on
    pub async fn accept_dialogs(&self) -> PomResult<()> {
        self.driver.set_dialog_policy(DialogPolicy::Accept).await
    }

    /// Dismiss every dialog opened from now on
    pub async fn dismiss_dialogs(&self) -> PomResult<()> {
        self.driver.set_dialog_policy(DialogPolicy::Dismiss).await
    }

    /// Wait for the next dialog the page opens
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] if no dialog opens within the action budget
    pub async fn wait_for_dialog(&self) -> PomResult<Dialog> {
        let pending = &self.pending_dialogs;
        let outcome = poll_until(self.wait_options(), "wait_for_dialog", || async move {
            let observed = self.driver.take_dialogs().await?;
            let mut queue = pending
                .lock()
                .map_err(|_| PomError::driver("dialog queue poisoned"))?;
            queue.extend(observed);
            Ok(match queue.pop_front() {
                Some(dialog) => Probe::Ready(dialog),
                None => Probe::Pending("no dialog opened".to_string()),
            })
        })
        .await?;
        match outcome {
            WaitOutcome::Ready(dialog) => {
                debug!(kind = %dialog.dialog_type(), message = dialog.message(), "dialog");
                Ok(dialog)
            }
            WaitOutcome::TimedOut { reason, .. } => Err(PomError::ActionTimeout {
                operation: "wait_for_dialog".to_string(),
                locator: "dialog".to_string(),
                timeout_ms: self.timeouts.action_ms,
                reason,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------

    /// Apply `policy` to an assertion outcome about `location`
    pub fn enforce(
        &self,
        result: AssertionResult,
        policy: AssertionPolicy,
        location: &str,
    ) -> PomResult<()> {
        let mut soft = self
            .soft
            .lock()
            .map_err(|_| PomError::driver("soft assertion collector poisoned"))?;
        result.enforce(policy, &mut soft, location)
    }

    /// Poll `read` until `accept` holds, then turn the last value into an
    /// assertion outcome.
    async fn expect_until<T, R, Fut, A>(
        &self,
        subject: &str,
        mut read: R,
        accept: A,
        describe_failure: impl Fn(&T) -> String,
    ) -> PomResult<AssertionResult>
    where
        T: Clone,
        R: FnMut() -> Fut,
        Fut: std::future::Future<Output = PomResult<T>>,
        A: Fn(&T) -> bool,
    {
        let last: Mutex<Option<T>> = Mutex::new(None);
        let last = &last;
        let accept = &accept;
        let outcome = poll_until(self.wait_options(), subject, || {
            let read = read();
            async move {
                let value = read.await?;
                if accept(&value) {
                    return Ok(Probe::Ready(()));
                }
                if let Ok(mut slot) = last.lock() {
                    *slot = Some(value);
                }
                Ok(Probe::Pending(subject.to_string()))
            }
        })
        .await?;
        Ok(match outcome {
            WaitOutcome::Ready(()) => AssertionResult::pass(),
            WaitOutcome::TimedOut { .. } => {
                let observed = last.lock().ok().and_then(|slot| slot.clone());
                AssertionResult::fail(match observed {
                    Some(value) => describe_failure(&value),
                    None => format!("{subject}: condition never held"),
                })
            }
        })
    }

    /// Expect the element to become visible
    pub async fn expect_visible(&self, locator: &Locator, policy: AssertionPolicy) -> PomResult<()> {
        let subject = locator.description();
        let result = self
            .expect_until(
                &subject,
                || self.is_visible(locator),
                |visible| *visible,
                |_| format!("{subject}: expected visible, was hidden"),
            )
            .await?;
        self.enforce(result, policy, &subject)
    }

    /// Expect the element to be hidden or absent
    pub async fn expect_hidden(&self, locator: &Locator, policy: AssertionPolicy) -> PomResult<()> {
        let subject = locator.description();
        let result = self
            .expect_until(
                &subject,
                || self.is_visible(locator),
                |visible| !*visible,
                |_| format!("{subject}: expected hidden, was visible"),
            )
            .await?;
        self.enforce(result, policy, &subject)
    }

    async fn first_text_or_empty(&self, locator: &Locator) -> PomResult<Option<String>> {
        Ok(self.first(locator).await?.map(|e| e.text.trim().to_string()))
    }

    /// Expect the trimmed text of the first match to equal `expected`
    pub async fn expect_text(
        &self,
        locator: &Locator,
        expected: &str,
        policy: AssertionPolicy,
    ) -> PomResult<()> {
        let subject = locator.description();
        let result = self
            .expect_until(
                &subject,
                || self.first_text_or_empty(locator),
                |text| text.as_deref() == Some(expected),
                |text| match text {
                    Some(text) => format!("{subject}: expected text {expected:?}, got {text:?}"),
                    None => format!("{subject}: expected text {expected:?}, no element matched"),
                },
            )
            .await?;
        self.enforce(result, policy, &subject)
    }

    /// Expect the text of the first match to contain `needle`
    pub async fn expect_contains_text(
        &self,
        locator: &Locator,
        needle: &str,
        policy: AssertionPolicy,
    ) -> PomResult<()> {
        let subject = locator.description();
        let result = self
            .expect_until(
                &subject,
                || self.first_text_or_empty(locator),
                |text| text.as_deref().is_some_and(|t| t.contains(needle)),
                |text| match text {
                    Some(text) => format!("{subject}: expected {text:?} to contain {needle:?}"),
                    None => format!("{subject}: expected text containing {needle:?}, no element matched"),
                },
            )
            .await?;
        self.enforce(result, policy, &subject)
    }

    /// Expect exactly `expected` matches
    pub async fn expect_count(
        &self,
        locator: &Locator,
        expected: usize,
        policy: AssertionPolicy,
    ) -> PomResult<()> {
        let subject = locator.description();
        let result = self
            .expect_until(
                &subject,
                || self.count(locator),
                |count| *count == expected,
                |count| format!("{subject}: expected {expected} element(s), found {count}"),
            )
            .await?;
        self.enforce(result, policy, &subject)
    }

    /// Compare two already-read values
    pub fn expect_eq<T: PartialEq + fmt::Debug>(
        &self,
        subject: &str,
        expected: &T,
        actual: &T,
        policy: AssertionPolicy,
    ) -> PomResult<()> {
        self.enforce(AssertionResult::equals(subject, expected, actual), policy, subject)
    }

    /// Expect the current URL to match `pattern`
    pub async fn expect_url_matches(&self, pattern: &Regex, policy: AssertionPolicy) -> PomResult<()> {
        let result = self
            .expect_until(
                "url",
                || self.current_url(),
                |url| pattern.is_match(url),
                |url| format!("url: expected {url:?} to match /{pattern}/"),
            )
            .await?;
        self.enforce(result, policy, "url")
    }

    /// Snapshot of the soft-assertion collector
    #[must_use]
    pub fn soft_assertions(&self) -> SoftAssertions {
        self.soft.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Remove and return every recorded soft failure
    pub fn take_soft_failures(&self) -> Vec<AssertionFailure> {
        self.soft.lock().map(|mut s| s.take()).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockBrowser, MockElement};
    use std::time::Duration;

    const URL: &str = "https://app.test/";

    fn fast() -> Timeouts {
        Timeouts::uniform(200, 5)
    }

    fn actions_for(browser: &MockBrowser) -> PageActions {
        PageActions::new(Arc::new(browser.clone()), fast())
    }

    async fn open(browser: &MockBrowser) -> PageActions {
        let actions = actions_for(browser);
        actions.navigate(URL).await.unwrap();
        actions
    }

    mod click_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_visible_element() {
            let submit = Locator::css("#submit");
            let browser = MockBrowser::new().route(URL, {
                let submit = submit.clone();
                move |dom| dom.add(MockElement::new("button").answering(&submit).text("Submit"))
            });
            let actions = open(&browser).await;
            actions.click(&submit).await.unwrap();
            assert!(browser.was_called("click:#submit"));
        }

        #[tokio::test]
        async fn test_click_hidden_element_times_out_with_context() {
            let submit = Locator::css("#submit").described("submit button");
            let browser = MockBrowser::new().route(URL, {
                let submit = submit.clone();
                move |dom| dom.add(MockElement::new("button").answering(&submit).hidden())
            });
            let actions = open(&browser).await;
            let err = actions.click(&submit).await.unwrap_err();
            match err {
                PomError::ActionTimeout {
                    operation,
                    locator,
                    timeout_ms,
                    reason,
                } => {
                    assert_eq!(operation, "click");
                    assert_eq!(locator, "submit button");
                    assert_eq!(timeout_ms, 200);
                    assert_eq!(reason, "element is not visible");
                }
                other => panic!("unexpected {other}"),
            }
            assert!(!browser.was_called("click:#submit"));
        }

        #[tokio::test]
        async fn test_click_waits_for_delayed_element() {
            let late = Locator::css("#late");
            let browser = MockBrowser::new().route(URL, {
                let late = late.clone();
                move |dom| {
                    dom.add(
                        MockElement::new("a")
                            .answering(&late)
                            .visible_after(Duration::from_millis(40)),
                    )
                }
            });
            let actions = open(&browser).await;
            actions.click(&late).await.unwrap();
        }

        #[tokio::test]
        async fn test_disabled_element_is_not_actionable() {
            let button = Locator::css("#buy");
            let browser = MockBrowser::new().route(URL, {
                let button = button.clone();
                move |dom| dom.add(MockElement::new("button").answering(&button).disabled())
            });
            let actions = open(&browser).await;
            let err = actions.double_click(&button).await.unwrap_err();
            assert!(err.to_string().contains("double_click"));
            assert!(err.to_string().contains("disabled"));
        }
    }

    mod form_tests {
        use super::*;

        #[tokio::test]
        async fn test_fill_replaces_value() {
            let name = Locator::css("#name");
            let browser = MockBrowser::new().route(URL, {
                let name = name.clone();
                move |dom| dom.add(MockElement::input().answering(&name).value("old"))
            });
            let actions = open(&browser).await;
            actions.fill(&name, "Alice").await.unwrap();
            assert_eq!(actions.input_value(&name).await.unwrap(), "Alice");
        }

        #[tokio::test]
        async fn test_check_twice_stays_checked() {
            let agree = Locator::css("#agree");
            let browser = MockBrowser::new().route(URL, {
                let agree = agree.clone();
                move |dom| dom.add(MockElement::checkbox().answering(&agree))
            });
            let actions = open(&browser).await;
            actions.check(&agree).await.unwrap();
            actions.check(&agree).await.unwrap();
            let state = browser.query(&agree).await.unwrap();
            assert_eq!(state[0].checked, Some(true));
        }
    }

    mod read_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_is_trimmed_first_match() {
            let rows = Locator::css("tr");
            let browser = MockBrowser::new().route(URL, {
                let rows = rows.clone();
                move |dom| {
                    dom.add(MockElement::new("tr").answering(&rows).text("  first \n"));
                    dom.add(MockElement::new("tr").answering(&rows).text("second"));
                }
            });
            let actions = open(&browser).await;
            assert_eq!(actions.text(&rows).await.unwrap(), "first");
            assert_eq!(actions.count(&rows).await.unwrap(), 2);
            assert_eq!(actions.all_texts(&rows).await.unwrap(), vec!["first", "second"]);
        }

        #[tokio::test]
        async fn test_text_without_match_is_not_found() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            let err = actions
                .text(&Locator::css("#totalp").described("total"))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "text: no element matches total");
        }

        #[tokio::test]
        async fn test_wait_for_hidden_on_absent_element() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            actions.wait_for_hidden(&Locator::css("#modal")).await.unwrap();
            let err = actions
                .wait_for_visible(&Locator::css("#modal"))
                .await
                .unwrap_err();
            assert!(matches!(err, PomError::VisibilityTimeout { ref state, .. } if state == "visible"));
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_unknown_url_is_navigation_error() {
            let browser = MockBrowser::new();
            let actions = actions_for(&browser);
            let err = actions.navigate("https://nowhere.test/").await.unwrap_err();
            assert!(matches!(err, PomError::Navigation { .. }));
            assert!(err.is_timeout());
        }
    }

    mod verification_tests {
        use super::*;

        #[tokio::test]
        async fn test_soft_failures_accumulate() {
            let price = Locator::css(".price").described("price");
            let browser = MockBrowser::new().route(URL, {
                let price = price.clone();
                move |dom| dom.add(MockElement::new("td").answering(&price).text("360"))
            });
            let actions = open(&browser).await;
            actions
                .expect_text(&price, "790", AssertionPolicy::Soft)
                .await
                .unwrap();
            actions
                .expect_eq("total", &30, &20, AssertionPolicy::Soft)
                .unwrap();
            actions
                .expect_text(&price, "360", AssertionPolicy::Soft)
                .await
                .unwrap();

            let soft = actions.soft_assertions();
            assert_eq!(soft.failure_count(), 2);
            assert_eq!(soft.assertion_count(), 3);
            let report = soft.verify().unwrap_err().to_string();
            assert!(report.contains("\"790\""));
            assert!(report.contains("expected 30, got 20"));
        }

        #[tokio::test]
        async fn test_hard_failure_aborts() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            let err = actions
                .expect_visible(&Locator::css("#welcome"), AssertionPolicy::Hard)
                .await
                .unwrap_err();
            assert!(matches!(err, PomError::AssertionFailed { .. }));
            assert!(actions.soft_assertions().all_passed());
        }

        #[tokio::test]
        async fn test_expect_url_matches() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            let pattern = Regex::new(r"app\.test/?$").unwrap();
            actions
                .expect_url_matches(&pattern, AssertionPolicy::Hard)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_clones_share_collector() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            let other = actions.clone();
            other.expect_eq("x", &1, &2, AssertionPolicy::Soft).unwrap();
            assert_eq!(actions.take_soft_failures().len(), 1);
            assert!(other.soft_assertions().all_passed());
        }
    }

    mod screenshot_tests {
        use super::*;
        use crate::config::EnvKey;

        #[tokio::test]
        async fn test_screenshot_named_after_scenario() {
            let dir = tempfile::tempdir().unwrap();
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser)
                .await
                .with_artifacts(ArtifactStore::new(dir.path()), "cart flow", EnvKey::Stg);
            let path = actions.take_screenshot("cart").await.unwrap();
            assert!(path.ends_with("cart_flow_stg_cart.png"));
        }

        #[tokio::test]
        async fn test_screenshot_failure_is_not_fatal() {
            let dir = tempfile::tempdir().unwrap();
            let blocker = dir.path().join("blocker");
            std::fs::write(&blocker, b"x").unwrap();
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser)
                .await
                .with_artifacts(ArtifactStore::new(blocker.join("sub")), "s", EnvKey::Dev);
            assert!(actions.take_screenshot("home").await.is_none());
        }
    }

    mod dialog_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_dialog_after_click() {
            let add = Locator::css("#add");
            let browser = MockBrowser::new().route(URL, {
                let add = add.clone();
                move |dom| dom.add(MockElement::new("a").answering(&add))
            });
            browser.on_click(&add, |dom| dom.raise_alert("Product added"));
            let actions = open(&browser).await;
            actions.accept_dialogs().await.unwrap();
            actions.click(&add).await.unwrap();
            let dialog = actions.wait_for_dialog().await.unwrap();
            assert_eq!(dialog.message(), "Product added");
            assert!(dialog.is_handled());
        }

        #[tokio::test]
        async fn test_no_dialog_times_out() {
            let browser = MockBrowser::new().route(URL, |_| {});
            let actions = open(&browser).await;
            let err = actions.wait_for_dialog().await.unwrap_err();
            assert!(err.to_string().contains("wait_for_dialog"));
        }
    }
}

//! Buttons reacting to double, right and plain clicks.

use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::PomResult;
use crate::sites::join_url;
use crate::Locators;
use std::path::PathBuf;

/// Message after a double click
pub const DOUBLE_CLICK_MESSAGE: &str = "You have done a double click";
/// Message after a right click
pub const RIGHT_CLICK_MESSAGE: &str = "You have done a right click";
/// Message after the plain "Click Me" click
pub const DYNAMIC_CLICK_MESSAGE: &str = "You have done a dynamic click";

/// Locators of the buttons page
#[derive(Debug, Clone, PartialEq, Eq, Locators)]
#[locators(name = "buttons")]
pub struct ButtonsLocators {
    /// "Double Click Me"
    pub double_click: Locator,
    /// "Right Click Me"
    pub right_click: Locator,
    /// "Click Me", whose id changes on every load
    pub dynamic_click: Locator,
    /// Double click message
    pub double_click_message: Locator,
    /// Right click message
    pub right_click_message: Locator,
    /// Dynamic click message
    pub dynamic_click_message: Locator,
}

impl LocatorRegistry for ButtonsLocators {
    type Common = ();

    fn initialize((): ()) -> Self {
        Self {
            double_click: Locator::css("#doubleClickBtn").described("double click button"),
            right_click: Locator::css("#rightClickBtn").described("right click button"),
            dynamic_click: Locator::css("button")
                .with_text("Click Me")
                .nth(2)
                .described("dynamic click button"),
            double_click_message: Locator::css("#doubleClickMessage")
                .described("double click message"),
            right_click_message: Locator::css("#rightClickMessage")
                .described("right click message"),
            dynamic_click_message: Locator::css("#dynamicClickMessage")
                .described("dynamic click message"),
        }
    }
}

/// Buttons page object
#[derive(Debug, Clone)]
pub struct ButtonsPage {
    actions: PageActions,
    locators: ButtonsLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl ButtonsPage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: ButtonsLocators::build(),
            base_url: config.sites.demoqa.clone(),
            policy: AssertionPolicy::Soft,
        }
    }

    /// Use `policy` for every verification
    #[must_use]
    pub const fn with_policy(mut self, policy: AssertionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registry
    #[must_use]
    pub const fn locators(&self) -> &ButtonsLocators {
        &self.locators
    }

    /// Load the page
    pub async fn open(&self) -> PomResult<()> {
        self.actions
            .navigate(&join_url(&self.base_url, "buttons"))
            .await
    }

    /// Double-click the first button
    pub async fn double_click(&self) -> PomResult<()> {
        self.actions.double_click(&self.locators.double_click).await
    }

    /// Right-click the second button
    pub async fn right_click(&self) -> PomResult<()> {
        self.actions.right_click(&self.locators.right_click).await
    }

    /// Click the third button
    pub async fn dynamic_click(&self) -> PomResult<()> {
        self.actions.click(&self.locators.dynamic_click).await
    }

    /// All three clicks in page order
    pub async fn click_all(&self) -> PomResult<()> {
        self.double_click().await?;
        self.right_click().await?;
        self.dynamic_click().await
    }

    async fn verify_message(&self, locator: &Locator, expected: &str) -> PomResult<()> {
        self.actions.expect_visible(locator, self.policy).await?;
        self.actions.expect_text(locator, expected, self.policy).await
    }

    /// Double click message shown
    pub async fn verify_double_click_message(&self) -> PomResult<()> {
        self.verify_message(&self.locators.double_click_message, DOUBLE_CLICK_MESSAGE)
            .await
    }

    /// Right click message shown
    pub async fn verify_right_click_message(&self) -> PomResult<()> {
        self.verify_message(&self.locators.right_click_message, RIGHT_CLICK_MESSAGE)
            .await
    }

    /// Dynamic click message shown
    pub async fn verify_dynamic_click_message(&self) -> PomResult<()> {
        self.verify_message(&self.locators.dynamic_click_message, DYNAMIC_CLICK_MESSAGE)
            .await
    }

    /// Every message shown, then an optional screenshot
    pub async fn verify_all_messages(&self, screenshot: Option<&str>) -> PomResult<Option<PathBuf>> {
        self.verify_double_click_message().await?;
        self.verify_right_click_message().await?;
        self.verify_dynamic_click_message().await?;
        Ok(match screenshot {
            Some(target) => self.actions.take_screenshot(target).await,
            None => None,
        })
    }
}

impl PageObject for ButtonsPage {
    fn name(&self) -> &'static str {
        "demoqa buttons"
    }

    fn url_pattern(&self) -> &str {
        "/buttons"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.double_click)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::sites::DemoqaSim;
    use crate::result::PomError;

    #[tokio::test]
    async fn test_every_click_kind_shows_its_message() {
        let sim = DemoqaSim::new();
        let (actions, config) = sim.actions();
        let page = ButtonsPage::new(actions, &config);
        page.open().await.unwrap();
        assert!(page.is_loaded().await.unwrap());
        page.click_all().await.unwrap();
        assert!(page.verify_all_messages(None).await.unwrap().is_none());
        assert!(sim.browser().was_called("double_click:#doubleClickBtn"));
        assert!(sim.browser().was_called("right_click:#rightClickBtn"));
    }

    #[tokio::test]
    async fn test_plain_click_on_double_click_button_shows_nothing() {
        let sim = DemoqaSim::new();
        let (actions, config) = sim.actions();
        let page = ButtonsPage::new(actions.clone(), &config).with_policy(AssertionPolicy::Hard);
        page.open().await.unwrap();
        actions.click(&page.locators().double_click).await.unwrap();
        let err = page.verify_double_click_message().await.unwrap_err();
        assert!(matches!(err, PomError::AssertionFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_messages_are_all_collected() {
        let sim = DemoqaSim::new();
        let (actions, config) = sim.actions();
        let page = ButtonsPage::new(actions.clone(), &config);
        page.open().await.unwrap();
        page.dynamic_click().await.unwrap();
        page.verify_all_messages(None).await.unwrap();
        // each missing message fails both the visibility and the text check
        assert_eq!(actions.soft_assertions().failure_count(), 4);
    }
}

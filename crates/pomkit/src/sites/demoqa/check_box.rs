//! Checkbox tree.
//!
//! The tree starts collapsed. Toggles are addressed by role and position
//! because the site renders them without ids.

use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::PomResult;
use crate::sites::join_url;
use crate::Locators;

/// Result text after checking the notes leaf
pub const NOTES_SELECTED: &str = "You have selected :notes";

/// Locators of the checkbox tree
#[derive(Debug, Clone, PartialEq, Eq, Locators)]
#[locators(name = "check_box")]
pub struct CheckBoxLocators {
    /// Expand toggle of the root node
    pub home_toggle: Locator,
    /// Expand toggle of the desktop node
    pub desktop_toggle: Locator,
    /// Checkbox icon of the notes leaf
    pub notes: Locator,
    /// Selection summary
    pub result: Locator,
}

impl LocatorRegistry for CheckBoxLocators {
    type Common = ();

    fn initialize((): ()) -> Self {
        let toggle = Locator::role("button", "Toggle");
        Self {
            home_toggle: toggle.clone().first().described("home toggle"),
            desktop_toggle: toggle.nth(1).described("desktop toggle"),
            notes: Locator::css(
                ".rct-node.rct-node-leaf > .rct-text > label > .rct-checkbox > .rct-icon",
            )
            .first()
            .described("notes checkbox"),
            result: Locator::css("#result").described("selection result"),
        }
    }
}

/// Checkbox tree page object
#[derive(Debug, Clone)]
pub struct CheckBoxPage {
    actions: PageActions,
    locators: CheckBoxLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl CheckBoxPage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: CheckBoxLocators::build(),
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
    pub const fn locators(&self) -> &CheckBoxLocators {
        &self.locators
    }

    /// Load the tree
    pub async fn open(&self) -> PomResult<()> {
        self.actions
            .navigate(&join_url(&self.base_url, "checkbox"))
            .await
    }

    /// Expand the root node
    pub async fn expand_home(&self) -> PomResult<()> {
        self.actions.click(&self.locators.home_toggle).await?;
        self.actions.wait_for_visible(&self.locators.desktop_toggle).await
    }

    /// Expand the desktop node
    pub async fn expand_desktop(&self) -> PomResult<()> {
        self.actions.click(&self.locators.desktop_toggle).await?;
        self.actions.wait_for_visible(&self.locators.notes).await
    }

    /// Check the notes leaf; a checked leaf stays checked
    pub async fn check_notes(&self) -> PomResult<()> {
        self.actions.check(&self.locators.notes).await
    }

    /// The summary names the notes leaf
    pub async fn verify_result(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.result, self.policy)
            .await?;
        self.actions
            .expect_contains_text(&self.locators.result, NOTES_SELECTED, self.policy)
            .await
    }
}

impl PageObject for CheckBoxPage {
    fn name(&self) -> &'static str {
        "demoqa checkbox"
    }

    fn url_pattern(&self) -> &str {
        "/checkbox"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.home_toggle)
    }
}

//! Text box form.

use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::fixtures::TextBoxData;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::PomResult;
use crate::sites::join_url;
use crate::Locators;
use std::path::PathBuf;
use tracing::info;

/// Locators of the text box form
#[derive(Debug, Clone, PartialEq, Eq, Locators)]
#[locators(name = "text_box")]
pub struct TextBoxLocators {
    /// Full name input
    pub full_name: Locator,
    /// Email input
    pub email: Locator,
    /// Current address textarea
    pub current_address: Locator,
    /// Permanent address textarea
    pub permanent_address: Locator,
    /// Submit button
    pub submit: Locator,
    /// Echo of the submitted values
    pub output: Locator,
}

impl LocatorRegistry for TextBoxLocators {
    type Common = ();

    fn initialize((): ()) -> Self {
        Self {
            full_name: Locator::xpath(r#"//input[@id="userName"]"#).described("full name input"),
            email: Locator::xpath(r#"//input[@id="userEmail"]"#).described("email input"),
            current_address: Locator::xpath(r#"//textarea[@id="currentAddress"]"#)
                .described("current address"),
            permanent_address: Locator::xpath(r#"//textarea[@id="permanentAddress"]"#)
                .described("permanent address"),
            submit: Locator::xpath(r#"//button[@id="submit"]"#).described("submit button"),
            output: Locator::xpath(r#"//div[@id="output"]"#).described("result box"),
        }
    }
}

/// Text box page object
#[derive(Debug, Clone)]
pub struct TextBoxPage {
    actions: PageActions,
    locators: TextBoxLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl TextBoxPage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: TextBoxLocators::build(),
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
    pub const fn locators(&self) -> &TextBoxLocators {
        &self.locators
    }

    /// Load the form
    pub async fn open(&self) -> PomResult<()> {
        self.actions
            .navigate(&join_url(&self.base_url, "text-box"))
            .await
    }

    /// Type every field
    pub async fn fill_form(&self, data: &TextBoxData) -> PomResult<()> {
        info!(name = %data.full_name, "fill text box form");
        self.actions.fill(&self.locators.full_name, &data.full_name).await?;
        self.actions.fill(&self.locators.email, &data.email).await?;
        self.actions
            .fill(&self.locators.current_address, &data.current_address)
            .await?;
        self.actions
            .fill(&self.locators.permanent_address, &data.permanent_address)
            .await
    }

    /// Press submit
    pub async fn submit(&self) -> PomResult<()> {
        self.actions.click(&self.locators.submit).await
    }

    /// Fill and submit in one go
    pub async fn submit_form(&self, data: &TextBoxData) -> PomResult<()> {
        self.fill_form(data).await?;
        self.submit().await
    }

    /// Values currently typed in the form
    pub async fn read_back(&self) -> PomResult<TextBoxData> {
        Ok(TextBoxData {
            full_name: self.actions.input_value(&self.locators.full_name).await?,
            email: self.actions.input_value(&self.locators.email).await?,
            current_address: self
                .actions
                .input_value(&self.locators.current_address)
                .await?,
            permanent_address: self
                .actions
                .input_value(&self.locators.permanent_address)
                .await?,
        })
    }

    /// The result box echoes every submitted value.
    ///
    /// Returns the screenshot path when `screenshot` names one and the
    /// capture worked.
    pub async fn verify_result(
        &self,
        data: &TextBoxData,
        screenshot: Option<&str>,
    ) -> PomResult<Option<PathBuf>> {
        self.actions
            .expect_visible(&self.locators.output, self.policy)
            .await?;
        for value in [
            &data.full_name,
            &data.email,
            &data.current_address,
            &data.permanent_address,
        ] {
            self.actions
                .expect_contains_text(&self.locators.output, value, self.policy)
                .await?;
        }
        Ok(match screenshot {
            Some(target) => self.actions.take_screenshot(target).await,
            None => None,
        })
    }
}

impl PageObject for TextBoxPage {
    fn name(&self) -> &'static str {
        "demoqa text box"
    }

    fn url_pattern(&self) -> &str {
        "/text-box"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.submit)
    }
}

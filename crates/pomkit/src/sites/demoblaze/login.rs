//! Login modal.

use super::nav::NavLocators;
use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::fixtures::User;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::PomResult;
use crate::Locators;
use tracing::info;

/// Locators of the login modal
#[derive(Debug, Clone, Locators)]
#[locators(name = "login")]
pub struct LoginLocators {
    /// Shared navigation
    #[locators(flatten)]
    pub nav: NavLocators,
    /// Modal container
    pub modal: Locator,
    /// User name input
    pub username: Locator,
    /// Password input
    pub password: Locator,
    /// "Log in" button
    pub submit: Locator,
    /// Close (x) button
    pub close: Locator,
}

impl LocatorRegistry for LoginLocators {
    type Common = NavLocators;

    fn initialize(nav: NavLocators) -> Self {
        Self {
            nav,
            modal: Locator::xpath(r#"//div[@id="logInModal"]"#).described("login modal"),
            username: Locator::xpath(r#"//input[@id="loginusername"]"#).described("username input"),
            password: Locator::xpath(r#"//input[@id="loginpassword"]"#).described("password input"),
            submit: Locator::xpath(r#"//button[text()="Log in" and @onclick]"#)
                .described("login button"),
            close: Locator::xpath(r#"//div[@id="logInModal"]//button[@class="close"]"#)
                .described("login modal close"),
        }
    }
}

/// Login modal page object
#[derive(Debug, Clone)]
pub struct LoginPage {
    actions: PageActions,
    locators: LoginLocators,
    policy: AssertionPolicy,
}

impl LoginPage {
    /// Create the page
    #[must_use]
    pub fn new(actions: PageActions, _config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: LoginLocators::build(),
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
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Click "Log in" in the nav bar and wait for the modal
    pub async fn open_login_modal(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.login).await?;
        self.actions.wait_for_visible(&self.locators.modal).await
    }

    /// Submit credentials and wait for the modal to close
    ///
    /// # Errors
    ///
    /// [`PomError::VisibilityTimeout`](crate::PomError::VisibilityTimeout)
    /// when the site keeps the modal open (rejected credentials)
    pub async fn log_in(&self, username: &str, password: &str) -> PomResult<()> {
        info!(username, "log in");
        self.actions.fill(&self.locators.username, username).await?;
        self.actions.fill(&self.locators.password, password).await?;
        self.actions.click(&self.locators.submit).await?;
        self.actions.wait_for_hidden(&self.locators.modal).await
    }

    /// [`LoginPage::log_in`] with a fixture record
    pub async fn log_in_as(&self, user: &User) -> PomResult<()> {
        self.log_in(&user.username, &user.password).await
    }

    /// Close the modal without logging in
    pub async fn close_modal(&self) -> PomResult<()> {
        self.actions.click(&self.locators.close).await?;
        self.actions.wait_for_hidden(&self.locators.modal).await
    }

    /// Modal is open
    pub async fn verify_login_modal_visible(&self) -> PomResult<()> {
        self.actions.expect_visible(&self.locators.modal, self.policy).await
    }

    /// Modal is closed
    pub async fn verify_login_modal_hidden(&self) -> PomResult<()> {
        self.actions.expect_hidden(&self.locators.modal, self.policy).await
    }

    /// Nav "Log in" link is gone (logged in)
    pub async fn verify_login_button_hidden(&self) -> PomResult<()> {
        self.actions.expect_hidden(&self.locators.nav.login, self.policy).await
    }

    /// Nav "Log in" link is back (logged out)
    pub async fn verify_login_button_visible(&self) -> PomResult<()> {
        self.actions.expect_visible(&self.locators.nav.login, self.policy).await
    }
}

impl PageObject for LoginPage {
    fn name(&self) -> &'static str {
        "demoblaze login"
    }

    fn url_pattern(&self) -> &str {
        "/|/index.html"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.modal)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::sites::DemoblazeSim;
    use crate::result::PomError;
    use crate::sites::demoblaze::HomePage;

    #[tokio::test]
    async fn test_login_then_logout() {
        let sim = DemoblazeSim::new();
        let (actions, config) = sim.actions();
        let home = HomePage::new(actions.clone(), &config);
        let login = LoginPage::new(actions.clone(), &config).with_policy(AssertionPolicy::Hard);

        home.open().await.unwrap();
        login.verify_login_modal_hidden().await.unwrap();
        login.open_login_modal().await.unwrap();
        assert!(login.is_loaded().await.unwrap());
        login.log_in_as(&sim.user()).await.unwrap();

        login.verify_login_button_hidden().await.unwrap();
        home.verify_welcome_message(&sim.user().username).await.unwrap();
        home.verify_logout_visible().await.unwrap();

        home.logout().await.unwrap();
        login.verify_login_button_visible().await.unwrap();
        assert!(actions.soft_assertions().all_passed());
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_modal_open() {
        let sim = DemoblazeSim::new();
        let (actions, config) = sim.actions();
        let login = LoginPage::new(actions.clone(), &config);
        HomePage::new(actions.clone(), &config).open().await.unwrap();
        login.open_login_modal().await.unwrap();

        let err = login.log_in(&sim.user().username, "nope").await.unwrap_err();
        assert!(matches!(err, PomError::VisibilityTimeout { ref state, .. } if state == "hidden"));
        let dialogs = actions.driver().take_dialogs().await.unwrap();
        assert_eq!(dialogs[0].message(), "Wrong password.");

        login.close_modal().await.unwrap();
        login.verify_login_modal_hidden().await.unwrap();
        assert!(actions.soft_assertions().all_passed());
    }
}

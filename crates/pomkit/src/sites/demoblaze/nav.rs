//! Navigation bar shared by every demoblaze page.

use crate::locator::Locator;
use crate::registry::LocatorRegistry;
use crate::Locators;

/// Top navigation links
#[derive(Debug, Clone, PartialEq, Eq, Locators)]
#[locators(name = "nav")]
pub struct NavLocators {
    /// "Home" link
    pub home: Locator,
    /// "Cart" link
    pub cart: Locator,
    /// "Log in" link, hidden once logged in
    pub login: Locator,
    /// "Sign up" link
    pub sign_up: Locator,
    /// "Log out" link, shown once logged in
    pub logout: Locator,
    /// "Welcome <user>" banner
    pub welcome: Locator,
}

impl Default for NavLocators {
    fn default() -> Self {
        Self {
            home: Locator::xpath(r#"//a[@class="nav-link" and contains(text(), "Home")]"#)
                .described("home link"),
            cart: Locator::xpath(r#"//a[@id="cartur"]"#).described("cart link"),
            login: Locator::xpath(r#"//a[@id="login2"]"#).described("login link"),
            sign_up: Locator::xpath(r#"//a[@id="signin2"]"#).described("sign-up link"),
            logout: Locator::xpath(r#"//a[@id="logout2"]"#).described("logout link"),
            welcome: Locator::xpath(r#"//a[@id="nameofuser"]"#).described("welcome banner"),
        }
    }
}

impl LocatorRegistry for NavLocators {
    type Common = ();

    fn initialize((): ()) -> Self {
        Self::default()
    }
}

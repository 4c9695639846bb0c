//! Login form, inventory grid, cart and burger-menu logout.

use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::fixtures::User;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::PomResult;
use crate::sites::join_url;
use crate::Locators;
use tracing::info;

/// Title of the inventory page
pub const PRODUCTS_TITLE: &str = "Products";

/// Name of the product the journey adds
pub const BACKPACK: &str = "Sauce Labs Backpack";

/// Locators of the shopping demo
#[derive(Debug, Clone, PartialEq, Eq, Locators)]
#[locators(name = "inventory")]
pub struct InventoryLocators {
    /// User name input
    pub username: Locator,
    /// Password input
    pub password: Locator,
    /// Login button
    pub login_button: Locator,
    /// Login error banner
    pub login_error: Locator,
    /// Page title (`Products`, `Your Cart`)
    pub page_title: Locator,
    /// "Add to cart" of the backpack
    pub add_backpack: Locator,
    /// Listed title of the backpack
    pub backpack_title: Locator,
    /// Cart icon
    pub cart_link: Locator,
    /// Item names on the cart page
    pub cart_item_names: Locator,
    /// Burger menu button
    pub menu_button: Locator,
    /// Logout entry of the menu
    pub logout_link: Locator,
}

impl LocatorRegistry for InventoryLocators {
    type Common = ();

    fn initialize((): ()) -> Self {
        Self {
            username: Locator::xpath(r#"//input[@id="user-name"]"#).described("username input"),
            password: Locator::xpath(r#"//input[@id="password"]"#).described("password input"),
            login_button: Locator::xpath(r#"//input[@id="login-button"]"#)
                .described("login button"),
            login_error: Locator::xpath(r#"//h3[@data-test="error"]"#).described("login error"),
            page_title: Locator::xpath(r#"//span[@class="title"]"#).described("page title"),
            add_backpack: Locator::xpath(r#"//button[@id="add-to-cart-sauce-labs-backpack"]"#)
                .described("add backpack button"),
            backpack_title: Locator::xpath(
                r#"//a[@id="item_4_title_link"]//div[@class="inventory_item_name"]"#,
            )
            .described("backpack title"),
            cart_link: Locator::xpath(r#"//div[@id="shopping_cart_container"]"#)
                .described("cart link"),
            cart_item_names: Locator::xpath(r#"//div[@class="inventory_item_name"]"#)
                .described("cart item names"),
            menu_button: Locator::xpath(r#"//button[@id="react-burger-menu-btn"]"#)
                .described("menu button"),
            logout_link: Locator::xpath(r#"//a[@id="logout_sidebar_link"]"#)
                .described("logout link"),
        }
    }
}

/// Shopping demo page object
#[derive(Debug, Clone)]
pub struct InventoryPage {
    actions: PageActions,
    locators: InventoryLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl InventoryPage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: InventoryLocators::build(),
            base_url: config.sites.saucedemo.clone(),
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
    pub const fn locators(&self) -> &InventoryLocators {
        &self.locators
    }

    /// Load the login form
    pub async fn open(&self) -> PomResult<()> {
        self.actions.navigate(&join_url(&self.base_url, "")).await
    }

    /// Submit the login form
    pub async fn log_in(&self, username: &str, password: &str) -> PomResult<()> {
        info!(username, "log in");
        self.actions.fill(&self.locators.username, username).await?;
        self.actions.fill(&self.locators.password, password).await?;
        self.actions.click(&self.locators.login_button).await
    }

    /// [`InventoryPage::log_in`] with a fixture record
    pub async fn log_in_as(&self, user: &User) -> PomResult<()> {
        self.log_in(&user.username, &user.password).await
    }

    /// The inventory title shows up
    pub async fn verify_login_success(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.page_title, self.policy)
            .await?;
        self.actions
            .expect_text(&self.locators.page_title, PRODUCTS_TITLE, self.policy)
            .await
    }

    /// The login error banner mentions `needle`
    pub async fn verify_login_error(&self, needle: &str) -> PomResult<()> {
        self.actions
            .expect_contains_text(&self.locators.login_error, needle, self.policy)
            .await
    }

    /// Add the backpack and return its listed title
    pub async fn add_backpack_to_cart(&self) -> PomResult<String> {
        let title = self.actions.text(&self.locators.backpack_title).await?;
        self.actions.click(&self.locators.add_backpack).await?;
        Ok(title)
    }

    /// Open the cart
    pub async fn go_to_cart(&self) -> PomResult<()> {
        self.actions.click(&self.locators.cart_link).await?;
        self.actions
            .wait_for_visible(&self.locators.cart_item_names.clone().first())
            .await
    }

    /// The first cart item carries the title listed in the inventory
    pub async fn verify_product_in_cart(&self, listed_title: &str) -> PomResult<()> {
        self.actions
            .expect_text(
                &self.locators.cart_item_names.clone().first(),
                listed_title,
                self.policy,
            )
            .await
    }

    /// Log out through the burger menu
    pub async fn logout(&self) -> PomResult<()> {
        self.actions.click(&self.locators.menu_button).await?;
        self.actions.click(&self.locators.logout_link).await?;
        self.actions.wait_for_visible(&self.locators.login_button).await
    }
}

impl PageObject for InventoryPage {
    fn name(&self) -> &'static str {
        "saucedemo inventory"
    }

    fn url_pattern(&self) -> &str {
        "/inventory.html"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.page_title)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::ShopUsers;
    use crate::mock::sites::SauceSim;

    #[tokio::test]
    async fn test_login_add_backpack_logout() {
        let sim = SauceSim::new();
        let (actions, config) = sim.actions();
        let page = InventoryPage::new(actions, &config);
        page.open().await.unwrap();
        assert!(!page.is_loaded().await.unwrap());

        page.log_in_as(&ShopUsers::builtin().standard).await.unwrap();
        page.verify_login_success().await.unwrap();
        assert!(page.is_loaded().await.unwrap());

        let title = page.add_backpack_to_cart().await.unwrap();
        assert_eq!(title, BACKPACK);
        page.go_to_cart().await.unwrap();
        page.verify_product_in_cart(&title).await.unwrap();

        page.logout().await.unwrap();
        assert!(!page.is_loaded().await.unwrap());
    }

    #[tokio::test]
    async fn test_locked_user_sees_error() {
        let sim = SauceSim::new();
        let (actions, config) = sim.actions();
        let page = InventoryPage::new(actions.clone(), &config);
        page.open().await.unwrap();
        page.log_in_as(&ShopUsers::builtin().locked).await.unwrap();
        page.verify_login_error("locked out").await.unwrap();
        page.verify_login_success().await.unwrap();
        assert_eq!(actions.soft_assertions().failure_count(), 2);
    }
}

//! Product detail page.

use super::nav::NavLocators;
use crate::actions::PageActions;
use crate::assertion::{AssertionPolicy, AssertionResult};
use crate::config::SuiteConfig;
use crate::dialog::Dialog;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::{PomError, PomResult};
use crate::Locators;
use tracing::info;

/// Alert text shown after adding to the cart
pub const PRODUCT_ADDED: &str = "Product added";

/// Locators of the product page
#[derive(Debug, Clone, Locators)]
#[locators(name = "product")]
pub struct ProductLocators {
    /// Shared navigation
    #[locators(flatten)]
    pub nav: NavLocators,
    /// "Add to cart" button
    pub add_to_cart: Locator,
    /// Product name heading
    pub name: Locator,
    /// Price heading, e.g. `$790 *includes tax`
    pub price: Locator,
}

impl LocatorRegistry for ProductLocators {
    type Common = NavLocators;

    fn initialize(nav: NavLocators) -> Self {
        Self {
            nav,
            add_to_cart: Locator::xpath(
                r#"//a[contains(@class, "btn-success") and text()="Add to cart"]"#,
            )
            .described("add to cart button"),
            name: Locator::xpath(r#"//h2[@class="name"]"#).described("product name"),
            price: Locator::xpath(r#"//h3[@class="price-container"]"#).described("product price"),
        }
    }
}

/// Whole dollars from a rendered price such as `$790 *includes tax`
#[must_use]
pub fn parse_price(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Product detail page object
#[derive(Debug, Clone)]
pub struct ProductPage {
    actions: PageActions,
    locators: ProductLocators,
    policy: AssertionPolicy,
}

impl ProductPage {
    /// Create the page
    #[must_use]
    pub fn new(actions: PageActions, _config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: ProductLocators::build(),
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
    pub const fn locators(&self) -> &ProductLocators {
        &self.locators
    }

    /// Click "Add to cart", accepting the confirmation alert.
    ///
    /// Returns the alert so callers can check its text.
    pub async fn add_to_cart(&self) -> PomResult<Dialog> {
        self.actions.accept_dialogs().await?;
        self.actions.click(&self.locators.add_to_cart).await?;
        let dialog = self.actions.wait_for_dialog().await?;
        info!(message = dialog.message(), "add to cart");
        Ok(dialog)
    }

    /// Follow the "Home" link
    pub async fn navigate_home(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.home).await
    }

    /// Follow the "Cart" link
    pub async fn navigate_to_cart(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.cart).await
    }

    /// Displayed product name
    pub async fn product_name(&self) -> PomResult<String> {
        self.actions.text(&self.locators.name).await
    }

    /// Displayed price in whole dollars
    ///
    /// # Errors
    ///
    /// [`PomError::Driver`] if the price heading does not start with a number
    pub async fn price(&self) -> PomResult<u64> {
        let raw = self.actions.text(&self.locators.price).await?;
        parse_price(&raw).ok_or_else(|| PomError::driver(format!("unreadable price {raw:?}")))
    }

    /// Product heading shows up and names `name`
    pub async fn verify_on_product_page(&self, name: &str) -> PomResult<()> {
        self.actions.wait_for_visible(&self.locators.name).await?;
        self.actions
            .expect_contains_text(&self.locators.name, name, self.policy)
            .await
    }

    /// Product heading is exactly `name`
    pub async fn verify_product_name(&self, name: &str) -> PomResult<()> {
        self.actions
            .expect_text(&self.locators.name, name, self.policy)
            .await
    }

    /// Displayed price equals `expected`
    pub async fn verify_product_price(&self, expected: u64) -> PomResult<()> {
        let actual = self.price().await?;
        self.actions
            .expect_eq("product price", &expected, &actual, self.policy)
    }

    /// `dialog` is the "Product added" alert
    pub fn verify_added_alert(&self, dialog: &Dialog) -> PomResult<()> {
        self.actions.enforce(
            AssertionResult::contains("add to cart alert", dialog.message(), PRODUCT_ADDED),
            self.policy,
            "add to cart alert",
        )
    }
}

impl PageObject for ProductPage {
    fn name(&self) -> &'static str {
        "demoblaze product"
    }

    fn url_pattern(&self) -> &str {
        "/prod.html"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.add_to_cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dialog::DialogAction;
    use crate::fixtures::Category;
    use crate::mock::sites::DemoblazeSim;
    use crate::sites::demoblaze::HomePage;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$790 *includes tax"), Some(790));
        assert_eq!(parse_price(" 1100 "), Some(1100));
        assert_eq!(parse_price("free"), None);
    }

    #[tokio::test]
    async fn test_add_to_cart_accepts_alert() {
        let sim = DemoblazeSim::new();
        let (actions, config) = sim.actions();
        let home = HomePage::new(actions.clone(), &config);
        let product = ProductPage::new(actions.clone(), &config).with_policy(AssertionPolicy::Hard);

        home.open().await.unwrap();
        home.select_category(Category::Laptops).await.unwrap();
        home.select_product("Sony vaio i5").await.unwrap();
        assert!(product.is_loaded().await.unwrap());
        product.verify_on_product_page("Sony vaio").await.unwrap();
        product.verify_product_name("Sony vaio i5").await.unwrap();
        product.verify_product_price(790).await.unwrap();

        let dialog = product.add_to_cart().await.unwrap();
        assert_eq!(dialog.action(), &DialogAction::Accept);
        product.verify_added_alert(&dialog).unwrap();
        assert_eq!(sim.cart_names(), vec!["Sony vaio i5"]);
    }

    #[tokio::test]
    async fn test_wrong_price_is_recorded() {
        let sim = DemoblazeSim::new();
        let (actions, config) = sim.actions();
        HomePage::new(actions.clone(), &config).open().await.unwrap();
        HomePage::new(actions.clone(), &config)
            .select_product("Nexus 6")
            .await
            .unwrap();
        let product = ProductPage::new(actions.clone(), &config);
        product.verify_product_price(700).await.unwrap();
        let failures = actions.take_soft_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("expected 700, got 650"));
    }
}

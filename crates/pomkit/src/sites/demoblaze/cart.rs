//! Cart table.
//!
//! Rows are re-rendered by the site after every deletion, so rows, cells and
//! delete links are always addressed through builders keyed by the product
//! name as currently rendered. Nothing here keeps a handle across a delete.

use super::checkout::CheckoutPage;
use super::nav::NavLocators;
use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::locator::{xpath_literal, Locator};
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::{PomError, PomResult};
use crate::sites::join_url;
use crate::Locators;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const ROWS: &str = r#"//tbody[@id="tbodyid"]/tr"#;

/// Locators of the cart page
#[derive(Debug, Clone, Locators)]
#[locators(name = "cart")]
pub struct CartLocators {
    /// Shared navigation
    #[locators(flatten)]
    pub nav: NavLocators,
    /// Every item row
    pub rows: Locator,
    /// Product name cell of every row
    pub item_names: Locator,
    /// Price cell of every row
    pub item_prices: Locator,
    /// Delete link of every row
    pub delete_links: Locator,
    /// "Place Order" button
    pub place_order: Locator,
    /// Total heading
    pub total: Locator,
}

impl LocatorRegistry for CartLocators {
    type Common = NavLocators;

    fn initialize(nav: NavLocators) -> Self {
        Self {
            nav,
            rows: Locator::xpath(ROWS).described("cart rows"),
            item_names: Locator::xpath(format!("{ROWS}/td[2]")).described("cart item names"),
            item_prices: Locator::xpath(format!("{ROWS}/td[3]")).described("cart item prices"),
            delete_links: Locator::xpath(format!(r#"{ROWS}/td[4]/a[text()="Delete"]"#))
                .described("cart delete links"),
            place_order: Locator::xpath(r#"//button[text()="Place Order"]"#)
                .described("place order button"),
            total: Locator::xpath(r#"//h3[@id="totalp"]"#).described("cart total"),
        }
    }
}

impl CartLocators {
    fn row_path(name: &str) -> String {
        format!("{ROWS}[td[2][normalize-space()={}]]", xpath_literal(name))
    }

    /// Row of the product named `name`
    #[must_use]
    pub fn row_by_name(&self, name: &str) -> Locator {
        Locator::xpath(Self::row_path(name)).described(format!("cart row '{name}'"))
    }

    /// Name cell of the product named `name`
    #[must_use]
    pub fn cell_by_name(&self, name: &str) -> Locator {
        Locator::xpath(format!("{}/td[2]", Self::row_path(name)))
            .described(format!("cart cell '{name}'"))
    }

    /// Price cell of the product named `name`
    #[must_use]
    pub fn price_by_name(&self, name: &str) -> Locator {
        Locator::xpath(format!("{}/td[3]", Self::row_path(name)))
            .described(format!("cart price '{name}'"))
    }

    /// Delete link of the product named `name`
    #[must_use]
    pub fn delete_by_name(&self, name: &str) -> Locator {
        Locator::xpath(format!(r#"{}/td[4]/a[text()="Delete"]"#, Self::row_path(name)))
            .described(format!("delete '{name}'"))
    }
}

/// One listed cart row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name
    pub name: String,
    /// Price in whole USD
    pub price: u64,
}

fn parse_amount(what: &str, raw: &str) -> PomResult<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| PomError::driver(format!("{what} {raw:?} is not a whole number")))
}

/// Cart page object
#[derive(Debug, Clone)]
pub struct CartPage {
    actions: PageActions,
    locators: CartLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl CartPage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: CartLocators::build(),
            base_url: config.sites.demoblaze.clone(),
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
    pub const fn locators(&self) -> &CartLocators {
        &self.locators
    }

    /// Load the cart by URL
    pub async fn open(&self) -> PomResult<()> {
        self.actions
            .navigate(&join_url(&self.base_url, "cart.html"))
            .await?;
        self.actions.wait_for_visible(&self.locators.place_order).await
    }

    /// Follow the nav "Cart" link
    pub async fn navigate_to_cart(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.cart).await?;
        self.actions.wait_for_visible(&self.locators.place_order).await
    }

    /// Follow the nav "Home" link
    pub async fn navigate_home(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.home).await
    }

    /// Delete the row of `name` and wait for the table to shrink
    ///
    /// # Errors
    ///
    /// [`PomError::ActionTimeout`] when no row is named `name` or the row
    /// count never drops
    pub async fn remove_item(&self, name: &str) -> PomResult<()> {
        let before = self.actions.count(&self.locators.rows).await?;
        info!(name, rows = before, "remove cart item");
        self.actions.click(&self.locators.delete_by_name(name)).await?;
        self.actions
            .wait_for_count(&self.locators.rows, before.saturating_sub(1))
            .await
    }

    /// Delete rows until none are left.
    ///
    /// The live row count is re-read after every deletion; the loop stops when
    /// the table is empty or fails when a deletion does not take.
    pub async fn clear_all_items(&self) -> PomResult<()> {
        loop {
            let remaining = self.actions.count(&self.locators.rows).await?;
            if remaining == 0 {
                break;
            }
            debug!(remaining, "clearing cart");
            let first_delete = self.locators.delete_links.clone().first();
            self.actions.click(&first_delete).await?;
            self.actions
                .wait_for_count(&self.locators.rows, remaining - 1)
                .await?;
        }
        self.verify_item_count(0).await
    }

    /// Click "Place Order" and hand over to the checkout modal
    pub async fn place_order(&self) -> PomResult<CheckoutPage> {
        let mut checkout = CheckoutPage::attach(self.actions.clone()).with_policy(self.policy);
        checkout.place_order().await?;
        Ok(checkout)
    }

    /// Number of rows
    pub async fn item_count(&self) -> PomResult<usize> {
        self.actions.count(&self.locators.rows).await
    }

    /// Every listed row, in table order
    pub async fn items(&self) -> PomResult<Vec<CartItem>> {
        let names = self.actions.all_texts(&self.locators.item_names).await?;
        let prices = self.actions.all_texts(&self.locators.item_prices).await?;
        if names.len() != prices.len() {
            return Err(PomError::driver(format!(
                "cart re-rendered while reading: {} names, {} prices",
                names.len(),
                prices.len()
            )));
        }
        names
            .into_iter()
            .zip(prices)
            .map(|(name, price)| {
                Ok(CartItem {
                    price: parse_amount("price", &price)?,
                    name,
                })
            })
            .collect()
    }

    /// Displayed total; an empty cart renders no total and reads as 0
    pub async fn total(&self) -> PomResult<u64> {
        let texts = self.actions.all_texts(&self.locators.total).await?;
        match texts.first() {
            Some(raw) => parse_amount("total", raw),
            None => Err(PomError::NotFound {
                operation: "total".to_string(),
                locator: self.locators.total.description(),
            }),
        }
    }

    /// A row for `name` is shown
    pub async fn verify_item_in_cart(&self, name: &str) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.row_by_name(name), self.policy)
            .await
    }

    /// No row for `name` is shown
    pub async fn verify_item_not_in_cart(&self, name: &str) -> PomResult<()> {
        self.actions
            .expect_hidden(&self.locators.cell_by_name(name), self.policy)
            .await
    }

    /// The row of `name` shows `expected` as its price
    pub async fn verify_product_price(&self, name: &str, expected: u64) -> PomResult<()> {
        let raw = self.actions.text(&self.locators.price_by_name(name)).await?;
        let actual = parse_amount("price", &raw)?;
        self.actions
            .expect_eq(&format!("price of {name}"), &expected, &actual, self.policy)
    }

    /// Exactly `expected` rows are shown
    pub async fn verify_item_count(&self, expected: usize) -> PomResult<()> {
        self.actions
            .expect_count(&self.locators.rows, expected, self.policy)
            .await
    }

    /// The total reads `expected`
    pub async fn verify_total_amount(&self, expected: u64) -> PomResult<()> {
        let actual = self.total().await?;
        self.actions
            .expect_eq("cart total", &expected, &actual, self.policy)
    }

    /// The total equals the sum of the listed prices
    pub async fn verify_total_matches_items(&self) -> PomResult<()> {
        let listed: u64 = self.items().await?.iter().map(|item| item.price).sum();
        let total = self.total().await?;
        self.actions
            .expect_eq("cart total vs listed prices", &listed, &total, self.policy)
    }
}

impl PageObject for CartPage {
    fn name(&self) -> &'static str {
        "demoblaze cart"
    }

    fn url_pattern(&self) -> &str {
        "/cart.html"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.place_order)
    }
}

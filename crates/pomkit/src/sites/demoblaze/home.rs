//! Store front: category sidebar and product grid.

use super::nav::NavLocators;
use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::fixtures::Category;
use crate::locator::{xpath_literal, Locator};
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::{PomError, PomResult};
use crate::sites::join_url;
use crate::Locators;
use regex::Regex;
use tracing::info;

/// Locators of the store front
#[derive(Debug, Clone, Locators)]
#[locators(name = "home")]
pub struct HomeLocators {
    /// Shared navigation
    #[locators(flatten)]
    pub nav: NavLocators,
    /// "Phones" category link
    pub category_phones: Locator,
    /// "Laptops" category link
    pub category_laptops: Locator,
    /// "Monitors" category link
    pub category_monitors: Locator,
    /// Product title links in the grid
    pub product_links: Locator,
}

impl LocatorRegistry for HomeLocators {
    type Common = NavLocators;

    fn initialize(nav: NavLocators) -> Self {
        Self {
            nav,
            category_phones: Locator::xpath(r#"//a[text()="Phones"]"#).described("Phones category"),
            category_laptops: Locator::xpath(r#"//a[text()="Laptops"]"#)
                .described("Laptops category"),
            category_monitors: Locator::xpath(r#"//a[text()="Monitors"]"#)
                .described("Monitors category"),
            product_links: Locator::xpath(r#"//div[@id="tbodyid"]//a[@class="hrefch"]"#)
                .described("product links"),
        }
    }
}

impl HomeLocators {
    /// Sidebar link of `category`
    #[must_use]
    pub fn category(&self, category: Category) -> &Locator {
        match category {
            Category::Phones => &self.category_phones,
            Category::Laptops => &self.category_laptops,
            Category::Monitors => &self.category_monitors,
        }
    }

    /// Grid link of the product named `name`
    #[must_use]
    pub fn product_link(&self, name: &str) -> Locator {
        Locator::xpath(format!(
            r#"//div[@id="tbodyid"]//a[@class="hrefch" and normalize-space()={}]"#,
            xpath_literal(name)
        ))
        .described(format!("product link '{name}'"))
    }
}

/// Store front page object
#[derive(Debug, Clone)]
pub struct HomePage {
    actions: PageActions,
    locators: HomeLocators,
    base_url: String,
    policy: AssertionPolicy,
}

impl HomePage {
    /// Create the page for the configured site
    #[must_use]
    pub fn new(actions: PageActions, config: &SuiteConfig) -> Self {
        Self {
            actions,
            locators: HomeLocators::build(),
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
    pub const fn locators(&self) -> &HomeLocators {
        &self.locators
    }

    /// Load the store front by URL
    pub async fn open(&self) -> PomResult<()> {
        self.actions.navigate(&join_url(&self.base_url, "")).await
    }

    /// Follow the "Home" link
    pub async fn navigate_to_home(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.home).await
    }

    /// Filter the grid by `category` and wait for products to show
    pub async fn select_category(&self, category: Category) -> PomResult<()> {
        info!(%category, "select category");
        self.actions.click(self.locators.category(category)).await?;
        self.actions
            .wait_for_visible(&self.locators.product_links.clone().first())
            .await
    }

    /// Open the product page of `name`
    pub async fn select_product(&self, name: &str) -> PomResult<()> {
        self.actions.click(&self.locators.product_link(name)).await
    }

    /// Follow the "Cart" link
    pub async fn navigate_to_cart(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.cart).await
    }

    /// Log out and wait for the login link to come back
    pub async fn logout(&self) -> PomResult<()> {
        self.actions.click(&self.locators.nav.logout).await?;
        self.actions.wait_for_visible(&self.locators.nav.login).await
    }

    /// Names of the products currently in the grid
    pub async fn listed_products(&self) -> PomResult<Vec<String>> {
        self.actions.all_texts(&self.locators.product_links).await
    }

    /// The current URL belongs to the store
    pub async fn verify_on_home_page(&self) -> PomResult<()> {
        let host = self
            .base_url
            .split_once("://")
            .map_or(self.base_url.as_str(), |(_, rest)| rest)
            .trim_end_matches('/')
            .trim_start_matches("www.");
        let pattern = Regex::new(&regex::escape(host)).map_err(|e| PomError::config(e.to_string()))?;
        self.actions.expect_url_matches(&pattern, self.policy).await
    }

    /// `name` is listed in the grid
    pub async fn verify_product_displayed(&self, name: &str) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.product_link(name), self.policy)
            .await
    }

    /// At least one product is listed
    pub async fn verify_products_listed(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.product_links.clone().first(), self.policy)
            .await
    }

    /// The welcome banner names `username`
    pub async fn verify_welcome_message(&self, username: &str) -> PomResult<()> {
        self.actions
            .expect_contains_text(&self.locators.nav.welcome, username, self.policy)
            .await
    }

    /// The logout link is shown
    pub async fn verify_logout_visible(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.nav.logout, self.policy)
            .await
    }
}

impl PageObject for HomePage {
    fn name(&self) -> &'static str {
        "demoblaze home"
    }

    fn url_pattern(&self) -> &str {
        "/|/index.html"
    }

    fn actions(&self) -> &PageActions {
        &self.actions
    }

    fn ready_marker(&self) -> Option<&Locator> {
        Some(&self.locators.category_phones)
    }
}

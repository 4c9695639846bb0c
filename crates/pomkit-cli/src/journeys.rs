//! Built-in journeys over the three demo sites.
//!
//! Each journey is a plain async body over [`PageActions`], so the same code
//! runs against a live browser or against the in-memory site simulations.

use clap::ValueEnum;
use pomkit::fixtures::{load_for_env, CheckoutInfo, ShopUsers, TextBoxData};
use pomkit::mock::sites::{DemoblazeSim, DemoqaSim, SauceSim};
use pomkit::sites::demoblaze::{CartPage, HomePage, LoginPage, ProductPage};
use pomkit::sites::demoqa::{ButtonsPage, CheckBoxPage, TextBoxPage};
use pomkit::sites::saucedemo::InventoryPage;
use pomkit::{AssertionPolicy, BrowserDriver, PageActions, PomResult, SuiteConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Product the checkout journey buys
pub const CHECKOUT_PRODUCT: &str = "Nexus 6";

/// Env-keyed order form records under the fixture directory
pub const CHECKOUT_FIXTURE: &str = "checkout-info.json";

/// Env-keyed text box records under the fixture directory
pub const TEXT_BOX_FIXTURE: &str = "textbox.testdata.json";

/// A named end-to-end journey
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Journey {
    /// Buy one product on the e-commerce demo and read the confirmation
    Checkout,
    /// Log in and out of the e-commerce demo
    Login,
    /// Submit the widget showcase text box and check the echo
    TextBox,
    /// Expand the checkbox tree and tick a leaf
    CheckBox,
    /// Double, right and dynamic clicks on the buttons page
    Buttons,
    /// Log in to the shopping demo, cart the backpack, log out
    Shopping,
}

impl Journey {
    /// Every journey, in run order
    pub const ALL: [Self; 6] = [
        Self::Checkout,
        Self::Login,
        Self::TextBox,
        Self::CheckBox,
        Self::Buttons,
        Self::Shopping,
    ];

    /// Name used on the command line and in reports
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Login => "login",
            Self::TextBox => "text-box",
            Self::CheckBox => "check-box",
            Self::Buttons => "buttons",
            Self::Shopping => "shopping",
        }
    }

    /// Site the journey runs against
    #[must_use]
    pub const fn site(self) -> &'static str {
        match self {
            Self::Checkout | Self::Login => "demoblaze",
            Self::TextBox | Self::CheckBox | Self::Buttons => "demoqa",
            Self::Shopping => "saucedemo",
        }
    }

    /// A fresh simulated browser for this journey's site and the
    /// configuration pointing at it
    #[must_use]
    pub fn simulation(self) -> (Arc<dyn BrowserDriver>, SuiteConfig) {
        match self.site() {
            "demoblaze" => {
                let sim = DemoblazeSim::new();
                (Arc::new(sim.browser().clone()), sim.config().clone())
            }
            "demoqa" => {
                let sim = DemoqaSim::new();
                (Arc::new(sim.browser().clone()), sim.config().clone())
            }
            _ => {
                let sim = SauceSim::new();
                (Arc::new(sim.browser().clone()), sim.config().clone())
            }
        }
    }

    /// Run the journey body
    pub async fn run(self, actions: PageActions, config: SuiteConfig) -> PomResult<()> {
        info!(journey = self.name(), site = self.site(), "journey body");
        match self {
            Self::Checkout => checkout(&actions, &config).await,
            Self::Login => login(&actions, &config).await,
            Self::TextBox => text_box(&actions, &config).await,
            Self::CheckBox => check_box(&actions, &config).await,
            Self::Buttons => buttons(&actions, &config).await,
            Self::Shopping => shopping(&actions, &config).await,
        }
    }
}

impl std::fmt::Display for Journey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Order form used by the checkout journey
#[must_use]
pub fn sample_order() -> CheckoutInfo {
    CheckoutInfo {
        name: "Ada Lovelace".to_string(),
        country: "United Kingdom".to_string(),
        city: "London".to_string(),
        card: "4111111111111111".to_string(),
        month: "12".to_string(),
        year: "2030".to_string(),
    }
}

/// Text box input used by the text box journey
#[must_use]
pub fn sample_text_box() -> TextBoxData {
    TextBoxData {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        current_address: "12 St James's Square".to_string(),
        permanent_address: "Ockham Park".to_string(),
    }
}

/// Order form for `config`'s environment: the fixture directory's record
/// when one is configured, else [`sample_order`]
pub fn order_data(config: &SuiteConfig) -> PomResult<CheckoutInfo> {
    config.fixtures_dir.as_deref().map_or_else(
        || Ok(sample_order()),
        |root| load_for_env(root, config.env, CHECKOUT_FIXTURE),
    )
}

/// Text box input for `config`'s environment, falling back to
/// [`sample_text_box`]
pub fn text_box_data(config: &SuiteConfig) -> PomResult<TextBoxData> {
    config.fixtures_dir.as_deref().map_or_else(
        || Ok(sample_text_box()),
        |root| load_for_env(root, config.env, TEXT_BOX_FIXTURE),
    )
}

async fn checkout(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let order = order_data(config)?;
    let home = HomePage::new(actions.clone(), config);
    let product = ProductPage::new(actions.clone(), config);
    let cart = CartPage::new(actions.clone(), config);

    home.open().await?;
    home.verify_products_listed().await?;
    home.select_product(CHECKOUT_PRODUCT).await?;
    product.verify_product_name(CHECKOUT_PRODUCT).await?;
    let alert = product.add_to_cart().await?;
    product.verify_added_alert(&alert)?;

    product.navigate_to_cart().await?;
    cart.verify_item_in_cart(CHECKOUT_PRODUCT).await?;
    cart.verify_total_matches_items().await?;

    let mut checkout = cart.place_order().await?;
    checkout.fill_form(&order).await?;
    checkout.purchase().await?;
    checkout.verify_confirmation_popup().await?;

    let parsed = checkout.order_confirmation().await?;
    actions.expect_eq(
        "confirmed customer",
        &order.name,
        &parsed.order.name,
        AssertionPolicy::Soft,
    )?;
    actions.expect_eq(
        "confirmed card",
        &order.card,
        &parsed.order.card_number,
        AssertionPolicy::Soft,
    )?;
    checkout.close_confirmation().await
}

async fn login(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let home = HomePage::new(actions.clone(), config);
    let login = LoginPage::new(actions.clone(), config);
    let credentials = &config.credentials;

    home.open().await?;
    login.open_login_modal().await?;
    login
        .log_in(&credentials.username, &credentials.password)
        .await?;
    login.verify_login_button_hidden().await?;
    home.verify_welcome_message(&credentials.username).await?;
    home.logout().await?;
    login.verify_login_button_visible().await
}

async fn text_box(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let page = TextBoxPage::new(actions.clone(), config);
    let data = text_box_data(config)?;
    page.open().await?;
    page.submit_form(&data).await?;
    page.verify_result(&data, Some("text-box")).await?;
    Ok(())
}

async fn check_box(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let page = CheckBoxPage::new(actions.clone(), config);
    page.open().await?;
    page.expand_home().await?;
    page.expand_desktop().await?;
    page.check_notes().await?;
    page.verify_result().await
}

async fn buttons(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let page = ButtonsPage::new(actions.clone(), config);
    page.open().await?;
    page.click_all().await?;
    page.verify_all_messages(Some("buttons")).await?;
    Ok(())
}

async fn shopping(actions: &PageActions, config: &SuiteConfig) -> PomResult<()> {
    let page = InventoryPage::new(actions.clone(), config);
    page.open().await?;
    page.log_in_as(&ShopUsers::builtin().standard).await?;
    page.verify_login_success().await?;
    let title = page.add_backpack_to_cart().await?;
    page.go_to_cart().await?;
    page.verify_product_in_cart(&title).await?;
    page.logout().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pomkit::sites::demoqa::TextBoxLocators;
    use pomkit::{LocatorRegistry, Scenario};

    async fn run_simulated(journey: Journey) -> pomkit::ScenarioReport {
        let (driver, mut config) = journey.simulation();
        let dir = tempfile::tempdir().unwrap();
        config.artifact_dir = dir.path().to_path_buf();
        let body_config = config.clone();
        Scenario::new(journey.name(), journey.site(), config)
            .run(driver, move |actions| journey.run(actions, body_config))
            .await
    }

    mod naming_tests {
        use super::*;

        #[test]
        fn test_names_match_value_enum() {
            for journey in Journey::ALL {
                let parsed = Journey::from_str(journey.name(), false).unwrap();
                assert_eq!(parsed, journey);
                assert_eq!(journey.to_string(), journey.name());
            }
        }

        #[test]
        fn test_every_site_has_a_journey() {
            let sites: std::collections::BTreeSet<_> =
                Journey::ALL.iter().map(|j| j.site()).collect();
            assert_eq!(
                sites.into_iter().collect::<Vec<_>>(),
                vec!["demoblaze", "demoqa", "saucedemo"]
            );
        }
    }

    mod simulated_run_tests {
        use super::*;

        #[tokio::test]
        async fn test_every_journey_passes_on_its_simulation() {
            for journey in Journey::ALL {
                let report = run_simulated(journey).await;
                assert!(report.passed(), "{report}");
                assert_eq!(report.target, journey.site());
            }
        }

        #[tokio::test]
        async fn test_text_box_journey_types_fixture_record() {
            let fixtures = tempfile::tempdir().unwrap();
            std::fs::write(
                fixtures.path().join(TEXT_BOX_FIXTURE),
                r#"{"dev": {"tb_fullName": "Dev User", "tb_email": "dev@x.com"},
                    "stg": {"tb_fullName": "Grace Hopper", "tb_email": "grace@navy.mil",
                            "tb_currentAddress": "Arlington", "tb_permanentAddress": "New York"}}"#,
            )
            .unwrap();

            let sim = DemoqaSim::new();
            let (actions, mut config) = sim.actions();
            let artifacts = tempfile::tempdir().unwrap();
            let actions = actions.with_artifacts(
                pomkit::ArtifactStore::new(artifacts.path()),
                "text-box",
                pomkit::EnvKey::Stg,
            );
            config.fixtures_dir = Some(fixtures.path().to_path_buf());
            config.env = pomkit::EnvKey::Stg;
            Journey::TextBox.run(actions.clone(), config).await.unwrap();

            assert_eq!(actions.soft_assertions().failure_count(), 0);
            let output = sim
                .browser()
                .query(&TextBoxLocators::build().output)
                .await
                .unwrap();
            assert!(output[0].text.contains("Grace Hopper"));
            assert!(!output[0].text.contains("Dev User"));
        }

        #[test]
        fn test_data_falls_back_without_fixture_dir() {
            let config = SuiteConfig::default();
            assert_eq!(order_data(&config).unwrap(), sample_order());
            assert_eq!(text_box_data(&config).unwrap(), sample_text_box());
        }

        #[test]
        fn test_missing_fixture_file_is_reported() {
            let dir = tempfile::tempdir().unwrap();
            let config = SuiteConfig {
                fixtures_dir: Some(dir.path().to_path_buf()),
                ..SuiteConfig::default()
            };
            let err = order_data(&config).unwrap_err();
            assert!(matches!(err, pomkit::PomError::Fixture { .. }));
            assert!(err.to_string().contains(CHECKOUT_FIXTURE));
        }

        #[tokio::test]
        async fn test_simulation_points_config_at_simulated_host() {
            let (_, config) = Journey::Checkout.simulation();
            assert_eq!(config.sites.demoblaze, pomkit::mock::sites::DEMOBLAZE);
            let (_, config) = Journey::Shopping.simulation();
            assert_eq!(config.sites.saucedemo, pomkit::mock::sites::SAUCEDEMO);
        }
    }
}

//! Checkout modal and order confirmation.
//!
//! The flow is a one-way state machine:
//!
//! ```text
//! CartView -> PlaceOrderClicked -> FormFilled -> PurchaseClicked -> ConfirmationVisible -> Closed
//! ```
//!
//! Each operation checks the current state before touching the browser and
//! only advances after the page confirmed the step. A purchase that never
//! shows the confirmation leaves the flow in `PurchaseClicked`, from which the
//! confirmation can not be read.

use super::confirmation::{parse_confirmation, ParsedConfirmation};
use super::nav::NavLocators;
use crate::actions::PageActions;
use crate::assertion::AssertionPolicy;
use crate::config::SuiteConfig;
use crate::fixtures::CheckoutInfo;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::{PomError, PomResult};
use crate::Locators;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Heading of the confirmation alert
pub const THANK_YOU: &str = "Thank you for your purchase!";

const ALERT: &str = r#"//div[contains(@class, "sweet-alert") and contains(@class, "showSweetAlert")]"#;

/// Locators of the checkout modal and the confirmation alert
#[derive(Debug, Clone, Locators)]
#[locators(name = "checkout")]
pub struct CheckoutLocators {
    /// Shared navigation
    #[locators(flatten)]
    pub nav: NavLocators,
    /// "Place Order" button on the cart page
    pub place_order: Locator,
    /// Order modal
    pub modal: Locator,
    /// Name input
    pub name: Locator,
    /// Country input
    pub country: Locator,
    /// City input
    pub city: Locator,
    /// Credit card input
    pub card: Locator,
    /// Month input
    pub month: Locator,
    /// Year input
    pub year: Locator,
    /// "Purchase" button
    pub purchase: Locator,
    /// "Close" button of the modal
    pub close: Locator,
    /// Confirmation alert container
    pub confirmation: Locator,
    /// Confirmation heading
    pub confirmation_heading: Locator,
    /// Confirmation body with the order details
    pub confirmation_details: Locator,
    /// "OK" button of the confirmation
    pub confirm_ok: Locator,
}

impl LocatorRegistry for CheckoutLocators {
    type Common = NavLocators;

    fn initialize(nav: NavLocators) -> Self {
        let input = |id: &str, what: &str| {
            Locator::xpath(format!(r#"//div[@id="orderModal"]//input[@id="{id}"]"#))
                .described(format!("order {what} input"))
        };
        Self {
            nav,
            place_order: Locator::xpath(r#"//button[text()="Place Order"]"#)
                .described("place order button"),
            modal: Locator::xpath(r#"//div[@id="orderModal"]"#).described("order modal"),
            name: input("name", "name"),
            country: input("country", "country"),
            city: input("city", "city"),
            card: input("card", "card"),
            month: input("month", "month"),
            year: input("year", "year"),
            purchase: Locator::xpath(r#"//div[@id="orderModal"]//button[text()="Purchase"]"#)
                .described("purchase button"),
            close: Locator::xpath(r#"//div[@id="orderModal"]//button[text()="Close"]"#)
                .described("order modal close"),
            confirmation: Locator::xpath(ALERT).described("order confirmation"),
            confirmation_heading: Locator::xpath(format!("{ALERT}/h2"))
                .described("order confirmation heading"),
            confirmation_details: Locator::xpath(format!(r#"{ALERT}/p[contains(@class, "lead")]"#))
                .described("order confirmation details"),
            confirm_ok: Locator::xpath(format!(r#"{ALERT}//button[text()="OK"]"#))
                .described("order confirmation ok"),
        }
    }
}

/// Where the checkout flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutState {
    /// On the cart page, modal closed
    CartView,
    /// Order modal open
    PlaceOrderClicked,
    /// Every form field filled
    FormFilled,
    /// Purchase submitted, confirmation not (yet) seen
    PurchaseClicked,
    /// Confirmation alert on screen
    ConfirmationVisible,
    /// Confirmation dismissed
    Closed,
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CartView => "cart view",
            Self::PlaceOrderClicked => "place order clicked",
            Self::FormFilled => "form filled",
            Self::PurchaseClicked => "purchase clicked",
            Self::ConfirmationVisible => "confirmation visible",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Checkout flow page object
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    actions: PageActions,
    locators: CheckoutLocators,
    state: CheckoutState,
    policy: AssertionPolicy,
}

impl CheckoutPage {
    /// Start a flow on the cart page
    #[must_use]
    pub fn new(actions: PageActions, _config: &SuiteConfig) -> Self {
        Self::attach(actions)
    }

    pub(super) fn attach(actions: PageActions) -> Self {
        Self {
            actions,
            locators: CheckoutLocators::build(),
            state: CheckoutState::CartView,
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
    pub const fn locators(&self) -> &CheckoutLocators {
        &self.locators
    }

    /// Current step
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    fn require(&self, expected: CheckoutState, operation: &str) -> PomResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(PomError::invalid_state(format!(
                "{operation} needs checkout state '{expected}', flow is at '{}'",
                self.state
            )))
        }
    }

    fn advance(&mut self, next: CheckoutState) {
        debug!(from = %self.state, to = %next, "checkout");
        self.state = next;
    }

    /// Open the order modal from the cart
    pub async fn place_order(&mut self) -> PomResult<()> {
        self.require(CheckoutState::CartView, "place_order")?;
        self.actions.click(&self.locators.place_order).await?;
        self.actions.wait_for_visible(&self.locators.modal).await?;
        self.advance(CheckoutState::PlaceOrderClicked);
        Ok(())
    }

    /// Fill every field of the order form
    pub async fn fill_form(&mut self, info: &CheckoutInfo) -> PomResult<()> {
        self.require(CheckoutState::PlaceOrderClicked, "fill_form")?;
        let fields = [
            (&self.locators.name, info.name.as_str()),
            (&self.locators.country, info.country.as_str()),
            (&self.locators.city, info.city.as_str()),
            (&self.locators.card, info.card.as_str()),
            (&self.locators.month, info.month.as_str()),
            (&self.locators.year, info.year.as_str()),
        ];
        for (locator, value) in fields {
            self.actions.click(locator).await?;
            self.actions.fill(locator, value).await?;
        }
        self.advance(CheckoutState::FormFilled);
        Ok(())
    }

    /// Read the form back as currently typed
    pub async fn form_values(&self) -> PomResult<CheckoutInfo> {
        Ok(CheckoutInfo {
            name: self.actions.input_value(&self.locators.name).await?,
            country: self.actions.input_value(&self.locators.country).await?,
            city: self.actions.input_value(&self.locators.city).await?,
            card: self.actions.input_value(&self.locators.card).await?,
            month: self.actions.input_value(&self.locators.month).await?,
            year: self.actions.input_value(&self.locators.year).await?,
        })
    }

    /// Submit the order and wait for the confirmation.
    ///
    /// # Errors
    ///
    /// [`PomError::VisibilityTimeout`] if no confirmation shows up; the flow
    /// then stays at [`CheckoutState::PurchaseClicked`].
    pub async fn purchase(&mut self) -> PomResult<()> {
        self.require(CheckoutState::FormFilled, "purchase")?;
        self.actions.accept_dialogs().await?;
        self.actions.click(&self.locators.purchase).await?;
        self.advance(CheckoutState::PurchaseClicked);
        self.actions
            .wait_for_visible(&self.locators.confirmation)
            .await?;
        self.advance(CheckoutState::ConfirmationVisible);
        info!("order confirmed");
        Ok(())
    }

    /// The confirmation alert is shown with its heading
    pub async fn verify_confirmation_popup(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.confirmation, self.policy)
            .await?;
        self.actions
            .expect_text(&self.locators.confirmation_heading, THANK_YOU, self.policy)
            .await
    }

    /// The order modal is open
    pub async fn verify_checkout_modal_visible(&self) -> PomResult<()> {
        self.actions
            .expect_visible(&self.locators.modal, self.policy)
            .await
    }

    /// Parse the order details of the visible confirmation
    ///
    /// # Errors
    ///
    /// [`PomError::InvalidState`] unless the confirmation is on screen
    pub async fn order_confirmation(&self) -> PomResult<ParsedConfirmation> {
        self.require(CheckoutState::ConfirmationVisible, "order_confirmation")?;
        let text = self
            .actions
            .text(&self.locators.confirmation_details)
            .await?;
        Ok(parse_confirmation(&text))
    }

    /// Dismiss the confirmation
    pub async fn close_confirmation(&mut self) -> PomResult<()> {
        self.require(CheckoutState::ConfirmationVisible, "close_confirmation")?;
        self.actions.click(&self.locators.confirm_ok).await?;
        self.actions
            .wait_for_hidden(&self.locators.confirmation)
            .await?;
        self.advance(CheckoutState::Closed);
        Ok(())
    }

    /// Close the order modal without purchasing and return to the cart view
    pub async fn cancel(&mut self) -> PomResult<()> {
        match self.state {
            CheckoutState::PlaceOrderClicked | CheckoutState::FormFilled => {
                self.actions.click(&self.locators.close).await?;
                self.actions.wait_for_hidden(&self.locators.modal).await?;
                self.advance(CheckoutState::CartView);
                Ok(())
            }
            other => Err(PomError::invalid_state(format!(
                "cancel needs an open order modal, flow is at '{other}'"
            ))),
        }
    }
}

impl PageObject for CheckoutPage {
    fn name(&self) -> &'static str {
        "demoblaze checkout"
    }

    fn url_pattern(&self) -> &str {
        "/cart.html"
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
    use crate::sites::demoblaze::CartPage;

    fn alice() -> CheckoutInfo {
        CheckoutInfo {
            name: "Alice".to_string(),
            country: "USA".to_string(),
            city: "NYC".to_string(),
            card: "4111111111111111".to_string(),
            month: "03".to_string(),
            year: "2030".to_string(),
        }
    }

    async fn open_cart(sim: &DemoblazeSim) -> CartPage {
        let (actions, config) = sim.actions();
        let cart = CartPage::new(actions, &config).with_policy(AssertionPolicy::Hard);
        cart.open().await.unwrap();
        cart
    }

    mod flow_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_checkout() {
            let sim = DemoblazeSim::new();
            sim.put_in_cart("Nexus 6");
            sim.put_in_cart("Samsung galaxy s6");
            let cart = open_cart(&sim).await;

            let mut checkout = cart.place_order().await.unwrap();
            assert_eq!(checkout.state(), CheckoutState::PlaceOrderClicked);
            assert!(checkout.is_loaded().await.unwrap());
            checkout.verify_checkout_modal_visible().await.unwrap();

            checkout.fill_form(&alice()).await.unwrap();
            assert_eq!(checkout.form_values().await.unwrap(), alice());

            checkout.purchase().await.unwrap();
            assert_eq!(checkout.state(), CheckoutState::ConfirmationVisible);
            checkout.verify_confirmation_popup().await.unwrap();

            let parsed = checkout.order_confirmation().await.unwrap();
            assert!(parsed.is_complete(), "{:?}", parsed.warnings);
            assert_eq!(parsed.order.amount, 1010);
            assert_eq!(parsed.order.name, "Alice");
            assert_eq!(parsed.order.card_number, "4111111111111111");
            assert!(!parsed.order.order_id.is_empty());

            checkout.close_confirmation().await.unwrap();
            assert_eq!(checkout.state(), CheckoutState::Closed);
            assert!(sim.cart_names().is_empty());
        }

        #[tokio::test]
        async fn test_cancel_returns_to_cart() {
            let sim = DemoblazeSim::new();
            sim.put_in_cart("Nexus 6");
            let cart = open_cart(&sim).await;
            let mut checkout = cart.place_order().await.unwrap();
            checkout.cancel().await.unwrap();
            assert_eq!(checkout.state(), CheckoutState::CartView);
            cart.verify_item_in_cart("Nexus 6").await.unwrap();
        }
    }

    mod state_tests {
        use super::*;

        #[tokio::test]
        async fn test_out_of_order_steps_are_rejected() {
            let sim = DemoblazeSim::new();
            let (actions, config) = sim.actions();
            let mut checkout = CheckoutPage::new(actions, &config);

            let err = checkout.purchase().await.unwrap_err();
            assert!(matches!(err, PomError::InvalidState { ref message } if message.contains("'form filled'")));
            let err = checkout.fill_form(&alice()).await.unwrap_err();
            assert!(matches!(err, PomError::InvalidState { .. }));
            assert!(checkout.order_confirmation().await.is_err());
            assert!(checkout.cancel().await.is_err());
            assert_eq!(checkout.state(), CheckoutState::CartView);
        }

        #[tokio::test]
        async fn test_empty_name_never_confirms() {
            let sim = DemoblazeSim::new();
            sim.put_in_cart("Nexus 6");
            let cart = open_cart(&sim).await;
            let mut checkout = cart.place_order().await.unwrap();
            let info = CheckoutInfo {
                name: String::new(),
                ..alice()
            };
            checkout.fill_form(&info).await.unwrap();

            let err = checkout.purchase().await.unwrap_err();
            assert!(matches!(err, PomError::VisibilityTimeout { ref state, .. } if state == "visible"));
            assert_eq!(checkout.state(), CheckoutState::PurchaseClicked);
            let dialogs = checkout.actions().driver().take_dialogs().await.unwrap();
            assert_eq!(dialogs[0].message(), "Please fill out Name and Creditcard.");
            assert!(matches!(
                checkout.order_confirmation().await,
                Err(PomError::InvalidState { .. })
            ));
            assert_eq!(sim.cart_names(), vec!["Nexus 6"]);
        }

        #[test]
        fn test_state_display() {
            assert_eq!(CheckoutState::ConfirmationVisible.to_string(), "confirmation visible");
        }
    }
}

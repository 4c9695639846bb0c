//! Pomkit: page objects and locators for browser end-to-end tests.
//!
//! Tests describe intentions ("log in", "remove this product", "read the
//! order confirmation"); page objects translate them into waiting, retrying
//! primitives over a browser driver.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//! │  Scenario    │──►│ Page object  │──►│ PageActions  │──►│ BrowserDriver │
//! │  (journey)   │   │ + registry   │   │ (waits,      │   │ (Chromium or  │
//! │              │   │   of Locator │   │  assertions) │   │  MockBrowser) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └───────────────┘
//! ```
//!
//! Data flows one way. A page resolves locators from its registry, hands them
//! to a [`PageActions`] primitive, and the primitive waits for the element to
//! be actionable before delegating to the driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use pomkit::prelude::*;
//!
//! let sim = DemoblazeSim::new();
//! let (actions, config) = sim.actions();
//! let cart = CartPage::new(actions, &config);
//! cart.open().await?;
//! cart.verify_total_matches_items().await?;
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

extern crate self as pomkit;

mod actions;
mod artifacts;
mod assertion;
mod config;
mod driver;
mod locator;
mod page_object;
mod registry;
mod result;
mod scenario;

/// Chromium driver over CDP
#[cfg(feature = "browser")]
pub mod cdp;

/// Native dialog policy and log
pub mod dialog;

/// Typed fixture records and JSON loading
pub mod fixtures;

/// In-memory browser and simulated demo sites
pub mod mock;

/// Concrete page objects
pub mod sites;

/// Bounded polling
pub mod wait;

pub use actions::PageActions;
pub use artifacts::{ArtifactName, ArtifactStore};
pub use assertion::{
    AssertionFailure, AssertionPolicy, AssertionResult, AssertionSummary, SoftAssertions,
};
#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
pub use config::{Credentials, EnvKey, SiteUrls, SuiteConfig, Timeouts, ENV_KEYS};
pub use dialog::{Dialog, DialogAction, DialogPolicy, DialogRecorder, DialogType};
pub use driver::{
    BoundingBox, BrowserDriver, ClickKind, DriverConfig, ElementSnapshot, LoadState,
};
pub use locator::{css_string, js_string, xpath_literal, Locator, Nth, Selector, TextFilter};
pub use page_object::{PageObject, UrlMatcher};
pub use pomkit_derive::Locators;
pub use registry::{LocatorRegistry, LocatorTable, LocatorTableBuilder, NamedLocators};
pub use result::{PomError, PomResult};
pub use scenario::{Scenario, ScenarioOutcome, ScenarioReport};
pub use wait::{poll_until, WaitOptions};

/// Everything a test file usually needs
pub mod prelude {
    pub use super::fixtures::{
        Category, CheckoutInfo, Product, ProductCatalog, ShopUsers, TextBoxData, User,
    };
    pub use super::mock::sites::{DemoblazeSim, DemoqaSim, SauceSim};
    pub use super::mock::{MockBrowser, MockDom, MockElement};
    pub use super::sites::demoblaze::{
        CartPage, CheckoutPage, CheckoutState, HomePage, LoginPage, ProductPage,
    };
    pub use super::sites::demoqa::{ButtonsPage, CheckBoxPage, TextBoxPage};
    pub use super::sites::saucedemo::InventoryPage;
    pub use super::{
        AssertionPolicy, BrowserDriver, EnvKey, Locator, LocatorRegistry, Locators,
        NamedLocators, PageActions, PageObject, PomError, PomResult, Scenario, ScenarioReport,
        SuiteConfig,
    };
}

//! Concrete page objects for the demo applications.
//!
//! Every page holds one locator registry value and a [`PageActions`] handle.
//! Operations are intention-revealing (`log_in`, `remove_item`,
//! `verify_total`) and only ever pass [`Locator`] values down to the action
//! layer.
//!
//! [`PageActions`]: crate::PageActions
//! [`Locator`]: crate::Locator

pub mod demoblaze;
pub mod demoqa;
pub mod saucedemo;

use crate::registry::NamedLocators;

/// Join a base URL and a path with exactly one slash between them
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{base}/")
    } else {
        format!("{base}/{path}")
    }
}

/// Default-built registries of every page, for listings
#[must_use]
pub fn all_registries() -> Vec<(&'static str, Box<dyn NamedLocators>)> {
    use crate::registry::LocatorRegistry;
    vec![
        ("demoblaze", Box::new(demoblaze::NavLocators::build()) as Box<dyn NamedLocators>),
        ("demoblaze", Box::new(demoblaze::HomeLocators::build())),
        ("demoblaze", Box::new(demoblaze::LoginLocators::build())),
        ("demoblaze", Box::new(demoblaze::ProductLocators::build())),
        ("demoblaze", Box::new(demoblaze::CartLocators::build())),
        ("demoblaze", Box::new(demoblaze::CheckoutLocators::build())),
        ("demoqa", Box::new(demoqa::TextBoxLocators::build())),
        ("demoqa", Box::new(demoqa::CheckBoxLocators::build())),
        ("demoqa", Box::new(demoqa::ButtonsLocators::build())),
        ("saucedemo", Box::new(saucedemo::InventoryLocators::build())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://demoqa.com", "text-box"), "https://demoqa.com/text-box");
        assert_eq!(join_url("https://demoqa.com/", "/buttons"), "https://demoqa.com/buttons");
        assert_eq!(join_url("https://www.demoblaze.com", ""), "https://www.demoblaze.com/");
    }

    #[test]
    fn test_registry_names_are_unique_per_site() {
        let registries = all_registries();
        let mut seen = std::collections::HashSet::new();
        for (site, registry) in &registries {
            assert!(seen.insert((*site, registry.registry_name().to_string())));
            assert!(!registry.entries().is_empty());
        }
    }
}

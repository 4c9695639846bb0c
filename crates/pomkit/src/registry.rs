//! Locator registries.
//!
//! A registry is a plain struct of [`Locator`] fields for one page or widget,
//! built in a single call. Shared locators (site navigation) are built first
//! and handed to the page-specific initializer, which may replace any of them.

use crate::locator::{Locator, Selector};
use crate::result::{PomError, PomResult};
use std::collections::BTreeMap;

/// Initialization contract for page registries.
///
/// `initialize` receives the fully built shared set and returns the fully
/// built page set. There is no intermediate, partially populated value.
pub trait LocatorRegistry: Sized {
    /// Shared locators this registry extends (`()` for none)
    type Common;

    /// Build the page registry on top of the shared set
    fn initialize(common: Self::Common) -> Self;

    /// Build the shared set with its defaults, then the page set
    #[must_use]
    fn build() -> Self
    where
        Self::Common: Default,
    {
        Self::initialize(Self::Common::default())
    }
}

/// Name-based access to a registry's locators.
///
/// Usually derived with `#[derive(Locators)]`.
pub trait NamedLocators {
    /// Registry name used in listings and errors
    fn registry_name(&self) -> &str;

    /// Every named locator, in declaration order
    fn entries(&self) -> Vec<(&str, &Locator)>;

    /// Look a locator up by field name
    ///
    /// # Errors
    ///
    /// Returns [`PomError::UnknownLocator`] for names the registry never defined
    fn lookup(&self, name: &str) -> PomResult<&Locator> {
        self.entries()
            .into_iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, locator)| locator)
            .ok_or_else(|| PomError::UnknownLocator {
                registry: self.registry_name().to_string(),
                name: name.to_string(),
            })
    }

    /// Names of every locator
    fn names(&self) -> Vec<&str> {
        self.entries().into_iter().map(|(name, _)| name).collect()
    }
}

/// Builder for an ad-hoc [`LocatorTable`]
#[derive(Debug, Clone, Default)]
pub struct LocatorTableBuilder {
    name: String,
    locators: BTreeMap<String, Locator>,
}

impl LocatorTableBuilder {
    /// Create a new table builder
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locators: BTreeMap::new(),
        }
    }

    /// Start from every entry of an existing registry
    #[must_use]
    pub fn extending(mut self, base: &dyn NamedLocators) -> Self {
        for (name, locator) in base.entries() {
            let _ = self.locators.insert(name.to_string(), locator.clone());
        }
        self
    }

    /// Add a locator with a name (replaces an earlier entry of that name)
    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, locator: Locator) -> Self {
        let _ = self.locators.insert(name.into(), locator);
        self
    }

    /// Add a locator from a raw selector string
    #[must_use]
    pub fn with_selector(self, name: impl Into<String>, raw: &str) -> Self {
        self.with_locator(name, Locator::from_selector(Selector::parse(raw)))
    }

    /// Build the table
    #[must_use]
    pub fn build(self) -> LocatorTable {
        LocatorTable {
            name: self.name,
            locators: self.locators,
        }
    }
}

/// Immutable name → locator map for pages without a dedicated struct
#[derive(Debug, Clone)]
pub struct LocatorTable {
    name: String,
    locators: BTreeMap<String, Locator>,
}

impl LocatorTable {
    /// Start building a table
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LocatorTableBuilder {
        LocatorTableBuilder::new(name)
    }

    /// Number of locators
    #[must_use]
    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Whether the table has no locators
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl NamedLocators for LocatorTable {
    fn registry_name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> Vec<(&str, &Locator)> {
        self.locators
            .iter()
            .map(|(name, locator)| (name.as_str(), locator))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Shared {
        home: Locator,
        cart: Locator,
    }

    impl Default for Shared {
        fn default() -> Self {
            Self {
                home: Locator::css("#home"),
                cart: Locator::css("#cart"),
            }
        }
    }

    #[derive(Debug)]
    struct Page {
        shared: Shared,
        title: Locator,
    }

    impl LocatorRegistry for Page {
        type Common = Shared;

        fn initialize(mut common: Shared) -> Self {
            common.home = Locator::css("#page-home");
            Self {
                shared: common,
                title: Locator::css("h1"),
            }
        }
    }

    impl NamedLocators for Page {
        fn registry_name(&self) -> &str {
            "page"
        }

        fn entries(&self) -> Vec<(&str, &Locator)> {
            vec![
                ("home", &self.shared.home),
                ("cart", &self.shared.cart),
                ("title", &self.title),
            ]
        }
    }

    mod initialization_tests {
        use super::*;

        #[test]
        fn test_shared_built_first_then_overridden() {
            let page = Page::build();
            assert_eq!(page.shared.home, Locator::css("#page-home"));
            assert_eq!(page.shared.cart, Locator::css("#cart"));
            assert_eq!(page.title, Locator::css("h1"));
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_lookup_known() {
            let page = Page::build();
            assert_eq!(page.lookup("title").unwrap(), &Locator::css("h1"));
            assert_eq!(page.names(), vec!["home", "cart", "title"]);
        }

        #[test]
        fn test_lookup_unknown_fails_loudly() {
            let page = Page::build();
            let err = page.lookup("submit").unwrap_err();
            assert!(matches!(
                err,
                PomError::UnknownLocator { ref registry, ref name } if registry == "page" && name == "submit"
            ));
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_builder_last_write_wins() {
            let table = LocatorTable::builder("login")
                .with_selector("submit", "//button[@id=\"a\"]")
                .with_selector("submit", "#b")
                .build();
            assert_eq!(table.len(), 1);
            assert_eq!(table.lookup("submit").unwrap(), &Locator::css("#b"));
        }

        #[test]
        fn test_extending_registry() {
            let page = Page::build();
            let table = LocatorTable::builder("extended")
                .extending(&page)
                .with_locator("title", Locator::css("h2"))
                .build();
            assert_eq!(table.len(), 3);
            assert_eq!(table.lookup("title").unwrap(), &Locator::css("h2"));
            assert_eq!(table.lookup("home").unwrap(), &Locator::css("#page-home"));
            assert!(!table.is_empty());
        }
    }
}

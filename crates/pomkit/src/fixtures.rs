//! Typed fixture records.
//!
//! Page objects receive already-parsed records; [`load_json`] is the only
//! place that touches fixture files. Environment-specific data lives either
//! in an [`EnvKeyed`] record or in a per-environment directory resolved by
//! [`fixture_path`].

use crate::config::EnvKey;
use crate::result::{PomError, PomResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Login credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User name
    pub username: String,
    /// Password
    pub password: String,
}

impl User {
    /// Create a user record
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Valid and invalid logins for the e-commerce demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersData {
    /// Account that can log in
    pub valid_user: User,
    /// Account that must be rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_user: Option<User>,
}

/// Product category of the e-commerce demo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Phones
    Phones,
    /// Laptops
    Laptops,
    /// Monitors
    Monitors,
}

impl Category {
    /// Every category, in navigation order
    pub const ALL: [Self; 3] = [Self::Phones, Self::Laptops, Self::Monitors];

    /// Link text in the category sidebar
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Phones => "Phones",
            Self::Laptops => "Laptops",
            Self::Monitors => "Monitors",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A product listed by the e-commerce demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, exactly as rendered
    pub name: String,
    /// Price in whole USD
    pub price: u64,
    /// Marketing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sidebar category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Product {
    /// Create a product in a category
    #[must_use]
    pub fn new(name: impl Into<String>, price: u64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
            category: Some(category),
        }
    }
}

/// Products grouped by category and keyed by a short fixture name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCatalog {
    /// Phones
    pub phones: BTreeMap<String, Product>,
    /// Laptops
    pub laptops: BTreeMap<String, Product>,
    /// Monitors
    pub monitors: BTreeMap<String, Product>,
}

impl ProductCatalog {
    /// The catalog the public demo site ships with
    #[must_use]
    pub fn builtin() -> Self {
        let group = |category: Category, items: &[(&str, &str, u64)]| {
            items
                .iter()
                .map(|(key, name, price)| ((*key).to_string(), Product::new(*name, *price, category)))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            phones: group(
                Category::Phones,
                &[
                    ("samsungGalaxyS6", "Samsung galaxy s6", 360),
                    ("nokiaLumia1520", "Nokia lumia 1520", 820),
                    ("nexus6", "Nexus 6", 650),
                    ("samsungGalaxyS7", "Samsung galaxy s7", 800),
                    ("iphone632gb", "Iphone 6 32gb", 790),
                    ("sonyXperiaZ5", "Sony xperia z5", 320),
                    ("htcOneM9", "HTC One M9", 700),
                ],
            ),
            laptops: group(
                Category::Laptops,
                &[
                    ("sonyVaioI5", "Sony vaio i5", 790),
                    ("sonyVaioI7", "Sony vaio i7", 790),
                    ("macbookAir", "MacBook air", 700),
                    ("dellI78gb", "Dell i7 8gb", 700),
                    ("dell2017", "2017 Dell 15.6 Inch", 700),
                    ("macbookPro", "MacBook Pro", 1100),
                ],
            ),
            monitors: group(
                Category::Monitors,
                &[
                    ("appleMonitor24", "Apple monitor 24", 400),
                    ("asusFullHd", "ASUS Full HD", 230),
                ],
            ),
        }
    }

    /// Products of one category
    #[must_use]
    pub const fn category(&self, category: Category) -> &BTreeMap<String, Product> {
        match category {
            Category::Phones => &self.phones,
            Category::Laptops => &self.laptops,
            Category::Monitors => &self.monitors,
        }
    }

    /// Look a product up by its fixture key in any category
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Product> {
        Category::ALL
            .iter()
            .find_map(|category| self.category(*category).get(key))
    }

    /// Look a product up by its rendered name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Product> {
        self.all().find(|product| product.name == name)
    }

    /// Every product, category by category
    pub fn all(&self) -> impl Iterator<Item = &Product> {
        self.phones
            .values()
            .chain(self.laptops.values())
            .chain(self.monitors.values())
    }
}

/// Order form input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInfo {
    /// Customer name
    pub name: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Credit card number
    pub card: String,
    /// Expiry month
    pub month: String,
    /// Expiry year
    pub year: String,
}

/// Text box form input for the widget showcase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBoxData {
    /// Full name
    #[serde(alias = "tb_fullName")]
    pub full_name: String,
    /// Email address
    #[serde(alias = "tb_email")]
    pub email: String,
    /// Current address
    #[serde(default, alias = "tb_currentAddress")]
    pub current_address: String,
    /// Permanent address
    #[serde(default, alias = "tb_permanentAddress")]
    pub permanent_address: String,
}

/// Accounts of the shopping demo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopUsers {
    /// Regular account
    pub standard: User,
    /// Account that is refused at login
    pub locked: User,
    /// Account with broken images and buttons
    pub problem: User,
    /// Account with artificial latency
    pub performance_glitch: User,
}

impl ShopUsers {
    /// The accounts the public demo site ships with
    #[must_use]
    pub fn builtin() -> Self {
        let user = |name: &str| User::new(name, "secret_sauce");
        Self {
            standard: user("standard_user"),
            locked: user("locked_out_user"),
            problem: user("problem_user"),
            performance_glitch: user("performance_glitch_user"),
        }
    }
}

/// A record with per-environment variants; `stg` and `prod` fall back to
/// `dev` when absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct EnvKeyed<T> {
    /// Development record (required)
    pub dev: T,
    /// Staging record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stg: Option<T>,
    /// Production record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod: Option<T>,
}

impl<T> EnvKeyed<T> {
    /// Same record for every environment
    #[must_use]
    pub const fn uniform(dev: T) -> Self {
        Self {
            dev,
            stg: None,
            prod: None,
        }
    }

    /// Record for `env`
    #[must_use]
    pub fn get(&self, env: EnvKey) -> &T {
        let specific = match env {
            EnvKey::Dev => None,
            EnvKey::Stg => self.stg.as_ref(),
            EnvKey::Prod => self.prod.as_ref(),
        };
        specific.unwrap_or(&self.dev)
    }

    /// Take the record for `env`
    #[must_use]
    pub fn select(self, env: EnvKey) -> T {
        let specific = match env {
            EnvKey::Dev => None,
            EnvKey::Stg => self.stg,
            EnvKey::Prod => self.prod,
        };
        specific.unwrap_or(self.dev)
    }
}

/// Read and deserialize a JSON fixture
///
/// # Errors
///
/// Returns [`PomError::Fixture`] naming the path when the file cannot be read
/// or does not match `T`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> PomResult<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PomError::Fixture {
            message: format!("{}: {e}", path.display()),
        })?;
    let value = serde_json::from_str(&text).map_err(|e| PomError::Fixture {
        message: format!("{}: {e}", path.display()),
    })?;
    debug!(path = %path.display(), "fixture loaded");
    Ok(value)
}

/// `<root>/<env>/<file>` when it exists, else `<root>/<file>`
#[must_use]
pub fn fixture_path(root: &Path, env: EnvKey, file: &str) -> PathBuf {
    let specific = root.join(env.as_str()).join(file);
    if specific.is_file() {
        specific
    } else {
        root.join(file)
    }
}

/// Load `file` under `root` as an [`EnvKeyed`] document and take the
/// record for `env`
///
/// # Errors
///
/// Same as [`load_json`]
pub fn load_for_env<T: DeserializeOwned>(root: &Path, env: EnvKey, file: &str) -> PomResult<T> {
    let keyed: EnvKeyed<T> = load_json(&fixture_path(root, env, file))?;
    Ok(keyed.select(env))
}

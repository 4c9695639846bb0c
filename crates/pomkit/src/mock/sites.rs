//! Simulated demo applications.
//!
//! Each simulation wires routes and click handlers onto a [`MockBrowser`]
//! using the same locator registries the page objects use. Application state
//! (cart, session) lives behind a shared mutex; routes re-render from it on
//! every load, so a deletion followed by a reload shows a fresh table just
//! like the real sites.

use super::{MockBrowser, MockDom, MockElement};
use crate::actions::PageActions;
use crate::config::{Credentials, SuiteConfig, Timeouts};
use crate::driver::ClickKind;
use crate::fixtures::{Category, Product, ProductCatalog, ShopUsers, User};
use crate::locator::Locator;
use crate::registry::LocatorRegistry;
use crate::sites::demoblaze::{
    CartLocators, CheckoutLocators, HomeLocators, LoginLocators, NavLocators, ProductLocators,
    THANK_YOU,
};
use crate::sites::demoqa::{
    ButtonsLocators, CheckBoxLocators, TextBoxLocators, DOUBLE_CLICK_MESSAGE,
    DYNAMIC_CLICK_MESSAGE, NOTES_SELECTED, RIGHT_CLICK_MESSAGE,
};
use crate::sites::join_url;
use crate::sites::saucedemo::{InventoryLocators, BACKPACK, PRODUCTS_TITLE};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Base URL of the simulated e-commerce demo
pub const DEMOBLAZE: &str = "https://www.demoblaze.com";
/// Base URL of the simulated widget showcase
pub const DEMOQA: &str = "https://demoqa.com";
/// Base URL of the simulated shopping demo
pub const SAUCEDEMO: &str = "https://www.saucedemo.com";

const BUDGET_MS: u64 = 300;
const POLL_MS: u64 = 5;
const FIRST_ORDER_ID: u64 = 7_000_000;
const ORDER_DATE: &str = "19/9/2026";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn shown(element: MockElement, visible: bool) -> MockElement {
    if visible {
        element
    } else {
        element.hidden()
    }
}

/// Marker only the simulation renders, for telling apart elements that share
/// a real selector
fn sim_key(name: &str) -> Locator {
    Locator::css(format!("[data-sim={name}]"))
}

/// Configuration pointing at the simulated sites, with short wait budgets
fn sim_config() -> SuiteConfig {
    let mut config = SuiteConfig {
        timeouts: Timeouts::uniform(BUDGET_MS, POLL_MS),
        credentials: Credentials {
            username: "pomkit".to_string(),
            password: "pomkit-pass".to_string(),
        },
        ..SuiteConfig::default()
    };
    config.sites.demoblaze = DEMOBLAZE.to_string();
    config.sites.demoqa = DEMOQA.to_string();
    config.sites.saucedemo = SAUCEDEMO.to_string();
    config
}

fn actions_over(browser: &MockBrowser, config: &SuiteConfig) -> PageActions {
    PageActions::new(Arc::new(browser.clone()), config.timeouts)
}

// ----------------------------------------------------------------------
// E-commerce demo
// ----------------------------------------------------------------------

#[derive(Debug, Default)]
struct Store {
    products: Vec<Product>,
    cart: Vec<String>,
    user: Option<String>,
    jam_deletes: bool,
    orders: u64,
}

impl Store {
    fn price_of(&self, name: &str) -> u64 {
        self.products
            .iter()
            .find(|product| product.name == name)
            .map_or(0, |product| product.price)
    }

    fn cart_total(&self) -> u64 {
        self.cart.iter().map(|name| self.price_of(name)).sum()
    }
}

#[derive(Debug)]
struct Demoblaze {
    store: Arc<Mutex<Store>>,
    credentials: Credentials,
    nav: NavLocators,
    home: HomeLocators,
    login: LoginLocators,
    product: ProductLocators,
    cart: CartLocators,
    checkout: CheckoutLocators,
}

impl Demoblaze {
    fn url(path: &str) -> String {
        join_url(DEMOBLAZE, path)
    }

    fn render_nav(&self, dom: &mut MockDom) {
        let user = lock(&self.store).user.clone();
        let logged_in = user.is_some();
        dom.add(MockElement::new("a").answering(&self.nav.home).text("Home (current)"));
        dom.add(MockElement::new("a").answering(&self.nav.cart).text("Cart"));
        dom.add(shown(
            MockElement::new("a").answering(&self.nav.login).text("Log in"),
            !logged_in,
        ));
        dom.add(shown(
            MockElement::new("a").answering(&self.nav.sign_up).text("Sign up"),
            !logged_in,
        ));
        dom.add(shown(
            MockElement::new("a").answering(&self.nav.logout).text("Log out"),
            logged_in,
        ));
        dom.add(shown(
            MockElement::new("a")
                .answering(&self.nav.welcome)
                .text(user.map(|u| format!("Welcome {u}")).unwrap_or_default()),
            logged_in,
        ));

        dom.add(MockElement::new("div").answering(&self.login.modal).hidden());
        dom.add(MockElement::input().answering(&self.login.username).hidden());
        dom.add(MockElement::input().answering(&self.login.password).hidden());
        dom.add(
            MockElement::new("button")
                .answering(&self.login.submit)
                .text("Log in")
                .hidden(),
        );
        dom.add(
            MockElement::new("button")
                .answering(&self.login.close)
                .text("Close")
                .hidden(),
        );
    }

    fn set_login_modal(&self, dom: &mut MockDom, visible: bool) {
        for locator in [
            &self.login.modal,
            &self.login.username,
            &self.login.password,
            &self.login.submit,
            &self.login.close,
        ] {
            dom.set_visible(locator, visible);
        }
    }

    fn submit_login(&self, dom: &mut MockDom) {
        let username = dom.value_of(&self.login.username).unwrap_or_default();
        let password = dom.value_of(&self.login.password).unwrap_or_default();
        if username != self.credentials.username {
            dom.raise_alert("User does not exist.");
            return;
        }
        if password != self.credentials.password {
            dom.raise_alert("Wrong password.");
            return;
        }
        lock(&self.store).user = Some(username.clone());
        self.set_login_modal(dom, false);
        dom.set_visible(&self.nav.login, false);
        dom.set_visible(&self.nav.sign_up, false);
        dom.set_visible(&self.nav.logout, true);
        dom.set_text(&self.nav.welcome, &format!("Welcome {username}"));
        dom.set_visible(&self.nav.welcome, true);
    }

    fn logout(&self, dom: &mut MockDom) {
        lock(&self.store).user = None;
        dom.redirect(Self::url(""));
    }

    fn render_grid(&self, dom: &mut MockDom, products: &[Product]) {
        for product in products {
            dom.add(
                MockElement::new("a")
                    .answering(&self.home.product_links)
                    .answering(&self.home.product_link(&product.name))
                    .text(&product.name),
            );
        }
    }

    fn render_home(&self, dom: &mut MockDom) {
        self.render_nav(dom);
        for category in Category::ALL {
            dom.add(
                MockElement::new("a")
                    .answering(self.home.category(category))
                    .text(category.label()),
            );
        }
        let products = lock(&self.store).products.clone();
        self.render_grid(dom, &products);
    }

    fn filter_category(&self, dom: &mut MockDom, category: Category) {
        dom.remove(&self.home.product_links);
        let products: Vec<Product> = lock(&self.store)
            .products
            .iter()
            .filter(|product| product.category == Some(category))
            .cloned()
            .collect();
        self.render_grid(dom, &products);
    }

    fn current_product(&self, url: &str) -> Option<Product> {
        let idp: usize = url.split("idp_=").nth(1)?.split('&').next()?.parse().ok()?;
        lock(&self.store).products.get(idp.checked_sub(1)?).cloned()
    }

    fn render_product(&self, dom: &mut MockDom) {
        self.render_nav(dom);
        let Some(product) = self.current_product(dom.url()) else {
            return;
        };
        dom.add(MockElement::new("h2").answering(&self.product.name).text(&product.name));
        dom.add(
            MockElement::new("h3")
                .answering(&self.product.price)
                .text(format!("${} *includes tax", product.price)),
        );
        dom.add(
            MockElement::new("a")
                .answering(&self.product.add_to_cart)
                .text("Add to cart"),
        );
    }

    fn add_to_cart(&self, dom: &mut MockDom) {
        if let Some(product) = self.current_product(dom.url()) {
            lock(&self.store).cart.push(product.name);
            dom.raise_alert("Product added.");
        }
    }

    fn order_fields(&self) -> [&Locator; 6] {
        [
            &self.checkout.name,
            &self.checkout.country,
            &self.checkout.city,
            &self.checkout.card,
            &self.checkout.month,
            &self.checkout.year,
        ]
    }

    fn render_cart(&self, dom: &mut MockDom) {
        self.render_nav(dom);
        let (rows, total) = {
            let store = lock(&self.store);
            let rows: Vec<(String, u64)> = store
                .cart
                .iter()
                .map(|name| (name.clone(), store.price_of(name)))
                .collect();
            (rows, store.cart_total())
        };
        for (name, price) in &rows {
            dom.add(
                MockElement::new("tr")
                    .answering(&self.cart.rows)
                    .answering(&self.cart.row_by_name(name))
                    .text(format!("{name} {price} Delete")),
            );
            dom.add(
                MockElement::new("td")
                    .answering(&self.cart.item_names)
                    .answering(&self.cart.cell_by_name(name))
                    .text(name),
            );
            dom.add(
                MockElement::new("td")
                    .answering(&self.cart.item_prices)
                    .answering(&self.cart.price_by_name(name))
                    .text(price.to_string()),
            );
            dom.add(
                MockElement::new("a")
                    .answering(&self.cart.delete_links)
                    .answering(&self.cart.delete_by_name(name))
                    .text("Delete"),
            );
        }
        let total = if rows.is_empty() {
            String::new()
        } else {
            total.to_string()
        };
        dom.add(MockElement::new("h3").answering(&self.cart.total).text(total));
        dom.add(
            MockElement::new("button")
                .answering(&self.cart.place_order)
                .text("Place Order"),
        );

        dom.add(MockElement::new("div").answering(&self.checkout.modal).hidden());
        for field in self.order_fields() {
            dom.add(MockElement::input().answering(field).hidden());
        }
        dom.add(
            MockElement::new("button")
                .answering(&self.checkout.purchase)
                .text("Purchase")
                .hidden(),
        );
        dom.add(
            MockElement::new("button")
                .answering(&self.checkout.close)
                .text("Close")
                .hidden(),
        );
    }

    fn set_order_modal(&self, dom: &mut MockDom, visible: bool) {
        dom.set_visible(&self.checkout.modal, visible);
        for field in self.order_fields() {
            dom.set_visible(field, visible);
        }
        dom.set_visible(&self.checkout.purchase, visible);
        dom.set_visible(&self.checkout.close, visible);
    }

    fn delete(&self, dom: &mut MockDom, name: &str) {
        {
            let mut store = lock(&self.store);
            if store.jam_deletes {
                return;
            }
            if let Some(position) = store.cart.iter().position(|n| n == name) {
                let _ = store.cart.remove(position);
            }
        }
        dom.redirect(Self::url("cart.html"));
    }

    fn purchase(&self, dom: &mut MockDom) {
        let name = dom.value_of(&self.checkout.name).unwrap_or_default();
        let card = dom.value_of(&self.checkout.card).unwrap_or_default();
        if name.is_empty() || card.is_empty() {
            dom.raise_alert("Please fill out Name and Creditcard.");
            return;
        }
        let (order_id, amount) = {
            let mut store = lock(&self.store);
            store.orders += 1;
            (FIRST_ORDER_ID + store.orders, store.cart_total())
        };
        self.set_order_modal(dom, false);
        dom.add(MockElement::new("div").answering(&self.checkout.confirmation));
        dom.add(
            MockElement::new("h2")
                .answering(&self.checkout.confirmation_heading)
                .text(THANK_YOU),
        );
        dom.add(
            MockElement::new("p")
                .answering(&self.checkout.confirmation_details)
                .text(format!(
                    "Id: {order_id}\nAmount: {amount} USD\nCard Number: {card}\nName: {name}\nDate: {ORDER_DATE}"
                )),
        );
        dom.add(
            MockElement::new("button")
                .answering(&self.checkout.confirm_ok)
                .text("OK"),
        );
    }

    fn confirm(&self, dom: &mut MockDom) {
        lock(&self.store).cart.clear();
        dom.redirect(Self::url(""));
    }
}

fn wire_demoblaze(site: &Arc<Demoblaze>, browser: &MockBrowser) {
    let on = |locator: &Locator, handler: fn(&Demoblaze, &mut MockDom)| {
        let site = Arc::clone(site);
        browser.on_click(locator, move |dom| handler(&site, dom));
    };
    on(&site.nav.home, |_, dom| dom.redirect(Demoblaze::url("")));
    on(&site.nav.cart, |_, dom| dom.redirect(Demoblaze::url("cart.html")));
    on(&site.nav.login, |site, dom| site.set_login_modal(dom, true));
    on(&site.nav.logout, Demoblaze::logout);
    on(&site.login.close, |site, dom| site.set_login_modal(dom, false));
    on(&site.login.submit, Demoblaze::submit_login);
    on(&site.product.add_to_cart, Demoblaze::add_to_cart);
    on(&site.cart.place_order, |site, dom| site.set_order_modal(dom, true));
    on(&site.checkout.close, |site, dom| site.set_order_modal(dom, false));
    on(&site.checkout.purchase, Demoblaze::purchase);
    on(&site.checkout.confirm_ok, Demoblaze::confirm);

    for category in Category::ALL {
        let site_ref = Arc::clone(site);
        browser.on_click(site.home.category(category), move |dom| {
            site_ref.filter_category(dom, category);
        });
    }

    let products = lock(&site.store).products.clone();
    for (index, product) in products.iter().enumerate() {
        let target = Demoblaze::url(&format!("prod.html?idp_={}", index + 1));
        browser.on_click(&site.home.product_link(&product.name), move |dom| {
            dom.redirect(target.clone());
        });
        let site_ref = Arc::clone(site);
        let name = product.name.clone();
        browser.on_click(&site.cart.delete_by_name(&product.name), move |dom| {
            site_ref.delete(dom, &name);
        });
    }
}

/// The e-commerce demo: store front, login, product pages, cart and checkout
#[derive(Debug)]
pub struct DemoblazeSim {
    browser: MockBrowser,
    store: Arc<Mutex<Store>>,
    config: SuiteConfig,
}

impl Default for DemoblazeSim {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoblazeSim {
    /// Simulate the shipped catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_products(ProductCatalog::builtin().all().cloned().collect())
    }

    /// Simulate a store selling exactly `products`
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let config = sim_config();
        let store = Arc::new(Mutex::new(Store {
            products,
            ..Store::default()
        }));
        let site = Arc::new(Demoblaze {
            store: Arc::clone(&store),
            credentials: config.credentials.clone(),
            nav: NavLocators::build(),
            home: HomeLocators::build(),
            login: LoginLocators::build(),
            product: ProductLocators::build(),
            cart: CartLocators::build(),
            checkout: CheckoutLocators::build(),
        });
        let render = |page: fn(&Demoblaze, &mut MockDom)| {
            let site = Arc::clone(&site);
            move |dom: &mut MockDom| page(&site, dom)
        };
        let browser = MockBrowser::new()
            .route(Demoblaze::url(""), render(Demoblaze::render_home))
            .route(Demoblaze::url("index.html"), render(Demoblaze::render_home))
            .route(Demoblaze::url("prod.html"), render(Demoblaze::render_product))
            .route(Demoblaze::url("cart.html"), render(Demoblaze::render_cart));
        wire_demoblaze(&site, &browser);
        Self {
            browser,
            store,
            config,
        }
    }

    /// A fresh action handle over the simulated browser, and the matching
    /// configuration
    #[must_use]
    pub fn actions(&self) -> (PageActions, SuiteConfig) {
        (actions_over(&self.browser, &self.config), self.config.clone())
    }

    /// The account the simulation accepts
    #[must_use]
    pub fn user(&self) -> User {
        User::new(
            self.config.credentials.username.clone(),
            self.config.credentials.password.clone(),
        )
    }

    /// Names in the server-side cart, in insertion order
    #[must_use]
    pub fn cart_names(&self) -> Vec<String> {
        lock(&self.store).cart.clone()
    }

    /// Add a product to the cart without going through the UI
    pub fn put_in_cart(&self, name: &str) {
        lock(&self.store).cart.push(name.to_string());
    }

    /// Make delete links stop working
    pub fn jam_deletes(&self) {
        lock(&self.store).jam_deletes = true;
    }

    /// Configuration pointing at the simulated hosts
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Underlying browser
    #[must_use]
    pub const fn browser(&self) -> &MockBrowser {
        &self.browser
    }
}

// ----------------------------------------------------------------------
// Widget showcase
// ----------------------------------------------------------------------

fn render_text_box(dom: &mut MockDom, locators: &TextBoxLocators) {
    dom.add(MockElement::input().answering(&locators.full_name));
    dom.add(MockElement::input().answering(&locators.email));
    dom.add(MockElement::new("textarea").value("").answering(&locators.current_address));
    dom.add(MockElement::new("textarea").value("").answering(&locators.permanent_address));
    dom.add(MockElement::new("button").answering(&locators.submit).text("Submit"));
    dom.add(MockElement::new("div").answering(&locators.output).hidden());
}

fn submit_text_box(dom: &mut MockDom, locators: &TextBoxLocators) {
    let read = |locator: &Locator| dom.value_of(locator).unwrap_or_default();
    let echo = format!(
        "Name:{}\nEmail:{}\nCurrent Address :{}\nPermananet Address :{}",
        read(&locators.full_name),
        read(&locators.email),
        read(&locators.current_address),
        read(&locators.permanent_address),
    );
    dom.set_text(&locators.output, &echo);
    dom.set_visible(&locators.output, true);
}

fn toggle(locators: &CheckBoxLocators, node: &str) -> MockElement {
    MockElement::new("button")
        .answering(&locators.home_toggle)
        .answering(&sim_key(node))
        .text("Toggle")
}

fn leaf(locators: &CheckBoxLocators, node: &str) -> MockElement {
    MockElement::new("span")
        .answering(&locators.notes)
        .answering(&sim_key(node))
        .checked(false)
}

fn wire_check_box(browser: &MockBrowser, locators: &CheckBoxLocators) {
    let check = locators.clone();
    browser.on_click(&sim_key("home-toggle"), move |dom| {
        dom.add(toggle(&check, "desktop-toggle"));
        dom.add(toggle(&check, "documents-toggle"));
        dom.add(toggle(&check, "downloads-toggle"));
    });
    let check = locators.clone();
    browser.on_click(&sim_key("desktop-toggle"), move |dom| {
        dom.add(leaf(&check, "notes"));
        dom.add(leaf(&check, "commands"));
    });
    let check = locators.clone();
    browser.on_click(&sim_key("notes"), move |dom| {
        if dom.checked_of(&sim_key("notes")) == Some(true) {
            dom.set_text(&check.result, NOTES_SELECTED);
            dom.set_visible(&check.result, true);
        }
    });
}

fn render_buttons(dom: &mut MockDom, locators: &ButtonsLocators) {
    let button = Locator::css("button");
    dom.add(
        MockElement::new("button")
            .answering(&button)
            .answering(&locators.double_click)
            .text("Double Click Me"),
    );
    dom.add(
        MockElement::new("button")
            .answering(&button)
            .answering(&locators.right_click)
            .text("Right Click Me"),
    );
    dom.add(
        MockElement::new("button")
            .answering(&button)
            .answering(&sim_key("dynamic"))
            .text("Click Me"),
    );
}

fn wire_buttons(browser: &MockBrowser, locators: &ButtonsLocators) {
    let message = |locator: &Locator, text: &'static str| {
        let locator = locator.clone();
        move |dom: &mut MockDom| dom.add(MockElement::new("p").answering(&locator).text(text))
    };
    browser.on(
        ClickKind::Double,
        &locators.double_click,
        message(&locators.double_click_message, DOUBLE_CLICK_MESSAGE),
    );
    browser.on(
        ClickKind::Right,
        &locators.right_click,
        message(&locators.right_click_message, RIGHT_CLICK_MESSAGE),
    );
    browser.on_click(
        &sim_key("dynamic"),
        message(&locators.dynamic_click_message, DYNAMIC_CLICK_MESSAGE),
    );
}

/// The widget showcase: text box, checkbox tree and buttons
#[derive(Debug)]
pub struct DemoqaSim {
    browser: MockBrowser,
    config: SuiteConfig,
}

impl Default for DemoqaSim {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoqaSim {
    /// Simulate the three widget pages
    #[must_use]
    pub fn new() -> Self {
        let text_box = TextBoxLocators::build();
        let check_box = CheckBoxLocators::build();
        let buttons = ButtonsLocators::build();

        let browser = MockBrowser::new()
            .route(join_url(DEMOQA, "text-box"), {
                let text_box = text_box.clone();
                move |dom| render_text_box(dom, &text_box)
            })
            .route(join_url(DEMOQA, "checkbox"), {
                let check_box = check_box.clone();
                move |dom| {
                    dom.add(toggle(&check_box, "home-toggle"));
                    dom.add(MockElement::new("div").answering(&check_box.result).hidden());
                }
            })
            .route(join_url(DEMOQA, "buttons"), {
                let buttons = buttons.clone();
                move |dom| render_buttons(dom, &buttons)
            });

        let submit = text_box.clone();
        browser.on_click(&text_box.submit, move |dom| submit_text_box(dom, &submit));
        wire_check_box(&browser, &check_box);
        wire_buttons(&browser, &buttons);

        Self {
            browser,
            config: sim_config(),
        }
    }

    /// A fresh action handle and the matching configuration
    #[must_use]
    pub fn actions(&self) -> (PageActions, SuiteConfig) {
        (actions_over(&self.browser, &self.config), self.config.clone())
    }

    /// Configuration pointing at the simulated hosts
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Underlying browser
    #[must_use]
    pub const fn browser(&self) -> &MockBrowser {
        &self.browser
    }
}

// ----------------------------------------------------------------------
// Shopping demo
// ----------------------------------------------------------------------

const PASSWORD_MISMATCH: &str =
    "Epic sadface: Username and password do not match any user in this service";
const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";

#[derive(Debug, Default)]
struct Shop {
    user: Option<String>,
    cart: Vec<String>,
}

#[derive(Debug)]
struct Saucedemo {
    shop: Mutex<Shop>,
    users: ShopUsers,
    locators: InventoryLocators,
}

impl Saucedemo {
    fn url(path: &str) -> String {
        join_url(SAUCEDEMO, path)
    }

    fn render_login(&self, dom: &mut MockDom) {
        let l = &self.locators;
        dom.add(MockElement::input().answering(&l.username));
        dom.add(MockElement::input().answering(&l.password));
        dom.add(MockElement::new("input").answering(&l.login_button).text("Login"));
        dom.add(MockElement::new("h3").answering(&l.login_error).hidden());
    }

    fn render_menu(&self, dom: &mut MockDom) {
        let l = &self.locators;
        dom.add(MockElement::new("div").answering(&l.cart_link));
        dom.add(MockElement::new("button").answering(&l.menu_button).text("Open Menu"));
        dom.add(
            MockElement::new("a")
                .answering(&l.logout_link)
                .text("Logout")
                .hidden(),
        );
    }

    fn render_inventory(&self, dom: &mut MockDom) {
        let l = &self.locators;
        dom.add(MockElement::new("span").answering(&l.page_title).text(PRODUCTS_TITLE));
        dom.add(
            MockElement::new("div")
                .answering(&l.backpack_title)
                .answering(&l.cart_item_names)
                .text(BACKPACK),
        );
        dom.add(
            MockElement::new("button")
                .answering(&l.add_backpack)
                .text("Add to cart"),
        );
        self.render_menu(dom);
    }

    fn render_cart(&self, dom: &mut MockDom) {
        let l = &self.locators;
        dom.add(MockElement::new("span").answering(&l.page_title).text("Your Cart"));
        let items = lock(&self.shop).cart.clone();
        for item in items {
            dom.add(MockElement::new("div").answering(&l.cart_item_names).text(item));
        }
        self.render_menu(dom);
    }

    fn submit_login(&self, dom: &mut MockDom) {
        let l = &self.locators;
        let username = dom.value_of(&l.username).unwrap_or_default();
        let password = dom.value_of(&l.password).unwrap_or_default();
        let accepted = [
            &self.users.standard,
            &self.users.problem,
            &self.users.performance_glitch,
        ]
        .into_iter()
        .any(|user| user.username == username && user.password == password);
        let error = if username == self.users.locked.username && password == self.users.locked.password {
            Some(LOCKED_OUT)
        } else if accepted {
            None
        } else {
            Some(PASSWORD_MISMATCH)
        };
        match error {
            Some(message) => {
                dom.set_text(&l.login_error, message);
                dom.set_visible(&l.login_error, true);
            }
            None => {
                lock(&self.shop).user = Some(username);
                dom.redirect(Self::url("inventory.html"));
            }
        }
    }

    fn add_backpack(&self, dom: &mut MockDom) {
        lock(&self.shop).cart.push(BACKPACK.to_string());
        dom.set_text(&self.locators.add_backpack, "Remove");
    }

    fn logout(&self, dom: &mut MockDom) {
        lock(&self.shop).user = None;
        dom.redirect(Self::url(""));
    }
}

/// The shopping demo: login, inventory, cart and menu logout
#[derive(Debug)]
pub struct SauceSim {
    browser: MockBrowser,
    config: SuiteConfig,
}

impl Default for SauceSim {
    fn default() -> Self {
        Self::new()
    }
}

impl SauceSim {
    /// Simulate the shop with its shipped accounts
    #[must_use]
    pub fn new() -> Self {
        let site = Arc::new(Saucedemo {
            shop: Mutex::new(Shop::default()),
            users: ShopUsers::builtin(),
            locators: InventoryLocators::build(),
        });
        let bind = |handler: fn(&Saucedemo, &mut MockDom)| {
            let site = Arc::clone(&site);
            move |dom: &mut MockDom| handler(&site, dom)
        };
        let browser = MockBrowser::new()
            .route(Saucedemo::url(""), bind(Saucedemo::render_login))
            .route(Saucedemo::url("inventory.html"), bind(Saucedemo::render_inventory))
            .route(Saucedemo::url("cart.html"), bind(Saucedemo::render_cart));

        let l = &site.locators;
        browser.on_click(&l.login_button, bind(Saucedemo::submit_login));
        browser.on_click(&l.add_backpack, bind(Saucedemo::add_backpack));
        browser.on_click(&l.cart_link, |dom| dom.redirect(Saucedemo::url("cart.html")));
        let logout_link = l.logout_link.clone();
        browser.on_click(&l.menu_button, move |dom| dom.set_visible(&logout_link, true));
        browser.on_click(&l.logout_link, bind(Saucedemo::logout));

        Self {
            browser,
            config: sim_config(),
        }
    }

    /// A fresh action handle and the matching configuration
    #[must_use]
    pub fn actions(&self) -> (PageActions, SuiteConfig) {
        (actions_over(&self.browser, &self.config), self.config.clone())
    }

    /// Configuration pointing at the simulated hosts
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Underlying browser
    #[must_use]
    pub const fn browser(&self) -> &MockBrowser {
        &self.browser
    }
}

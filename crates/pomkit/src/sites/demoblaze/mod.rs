//! E-commerce demo: store front, login modal, product page, cart and
//! checkout.
//!
//! Every registry flattens [`NavLocators`] so the navigation bar is reachable
//! from any page.

mod cart;
mod checkout;
pub mod confirmation;
mod home;
mod login;
mod nav;
mod product;

pub use cart::{CartItem, CartLocators, CartPage};
pub use checkout::{CheckoutLocators, CheckoutPage, CheckoutState, THANK_YOU};
pub use confirmation::{
    parse_confirmation, OrderConfirmation, ParseWarning, ParseWarningKind, ParsedConfirmation,
};
pub use home::{HomeLocators, HomePage};
pub use login::{LoginLocators, LoginPage};
pub use nav::NavLocators;
pub use product::{parse_price, ProductLocators, ProductPage, PRODUCT_ADDED};

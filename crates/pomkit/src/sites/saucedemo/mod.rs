//! Shopping demo: login, inventory, cart and logout.

mod inventory;

pub use inventory::{InventoryLocators, InventoryPage, BACKPACK, PRODUCTS_TITLE};

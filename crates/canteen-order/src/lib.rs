// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordering flow for Night Canteen.
//!
//! Loads the menu, keeps the session cart, hands finished orders and
//! feedback to the submission core, and renders the invoice for the last
//! order placed.

pub mod cart;
pub mod checkout;
pub mod hours;
pub mod invoice;
pub mod menu;

pub use cart::{Cart, Order, OrderLine};
pub use checkout::{Checkout, Customer, PlacedOrder};
pub use hours::OperatingHours;
pub use invoice::render_invoice;
pub use menu::{ItemId, Menu, MenuItem, MenuOrigin, load_menu, parse_menu};

/// Formats a rupee amount: whole amounts without decimals, others with two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

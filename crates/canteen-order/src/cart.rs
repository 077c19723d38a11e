// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session cart, kept under the `order` storage key.

use std::sync::Arc;

use canteen_core::{CanteenError, SessionStorage};
use canteen_storage::{LAST_ORDER_KEY, ORDER_KEY, read_json, write_json};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::menu::{ItemId, Menu, MenuItem};

/// A menu item with the quantity ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: u32,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// The cart contents as stored in the session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub total: f64,
}

impl Order {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `"Coffee (x2), BourBon (x1)"`.
    pub fn description(&self) -> String {
        self.items
            .iter()
            .map(|line| format!("{} (x{})", line.name, line.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Cart operations over session storage.
///
/// Every operation reads the stored order, changes it and writes it back,
/// so the storage key stays the single source of truth.
#[derive(Clone)]
pub struct Cart {
    storage: Arc<dyn SessionStorage>,
}

impl Cart {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// The stored order; missing or corrupt data reads as empty.
    pub fn current(&self) -> Order {
        read_json(self.storage.as_ref(), ORDER_KEY).unwrap_or_default()
    }

    pub fn save(&self, order: &Order) -> Result<(), CanteenError> {
        write_json(self.storage.as_ref(), ORDER_KEY, order)
    }

    /// Adds one of `item`, merging with an existing line.
    pub fn add_item(&self, item: &MenuItem) -> Result<Order, CanteenError> {
        let mut order = self.current();
        match order.items.iter_mut().find(|line| line.id.same_as(&item.id)) {
            Some(line) => line.quantity += 1,
            None => order.items.push(OrderLine {
                id: item.id.clone(),
                name: item.name.clone(),
                description: item.description.clone(),
                price: item.price,
                quantity: 1,
            }),
        }
        order.total += item.price;
        self.save(&order)?;
        debug!(item = %item.id, total = order.total, "item added to order");
        Ok(order)
    }

    /// Changes the quantity of the line for `id` by `delta`.
    ///
    /// Lines that reach zero are removed. Prices come from `menu`; the total
    /// never goes below zero.
    pub fn change_quantity(&self, menu: &Menu, id: &str, delta: i64) -> Result<Order, CanteenError> {
        let mut order = self.current();
        let Some(index) = order.items.iter().position(|line| line.id.matches(id)) else {
            return Err(CanteenError::Order(format!("item {id} is not in the order")));
        };
        let Some(menu_item) = menu.find(id) else {
            warn!(item = id, "ordered item is missing from the menu");
            return Err(CanteenError::Order(format!("item {id} is not on the menu")));
        };

        let quantity = i64::from(order.items[index].quantity) + delta;
        if quantity <= 0 {
            let removed = order.items.remove(index);
            order.total -= menu_item.price * f64::from(removed.quantity);
        } else {
            order.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            order.total += delta as f64 * menu_item.price;
        }
        order.total = order.total.max(0.0);

        self.save(&order)?;
        Ok(order)
    }

    /// Empties the cart, keeping the last submitted order.
    pub fn clear(&self) -> Result<(), CanteenError> {
        self.storage.remove_item(ORDER_KEY)
    }

    /// Starts over: clears the cart and forgets the last submitted order.
    pub fn reset(&self) -> Result<(), CanteenError> {
        self.storage.remove_item(ORDER_KEY)?;
        self.storage.remove_item(LAST_ORDER_KEY)
    }
}

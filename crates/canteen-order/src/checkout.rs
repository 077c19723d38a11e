// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning the cart into a submitted order, and sending feedback.

use std::sync::Arc;

use canteen_core::{CanteenError, Payload, SessionStorage};
use canteen_storage::{LAST_ORDER_KEY, read_json, write_json};
use canteen_submit::{Submitter, is_valid_mobile};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::cart::{Cart, OrderLine};
use crate::hours::OperatingHours;

/// Contact details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub room: String,
    pub mobile: String,
}

impl Customer {
    pub fn new(name: &str, room: &str, mobile: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            room: room.trim().to_string(),
            mobile: mobile.trim().to_string(),
        }
    }

    fn check(&self) -> Result<(), CanteenError> {
        if self.name.is_empty() || self.room.is_empty() || self.mobile.is_empty() {
            return Err(CanteenError::Order("Please fill in all required fields".into()));
        }
        if !is_valid_mobile(&self.mobile) {
            return Err(CanteenError::Order(
                "Please enter a valid 10-digit mobile number".into(),
            ));
        }
        Ok(())
    }
}

/// A submitted order as kept under `lastOrder` for invoice regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub name: String,
    pub room: String,
    pub mobile: String,
    /// Line description, e.g. `"Coffee (x2)"`.
    pub order: String,
    pub total: f64,
    pub items: Vec<OrderLine>,
    /// Local time the order was placed.
    pub timestamp: String,
}

impl PlacedOrder {
    fn to_payload(&self) -> Result<Payload, CanteenError> {
        let value = serde_json::to_value(self)
            .map_err(|e| CanteenError::Internal(format!("failed to encode order: {e}")))?;
        Payload::from_value(value)
            .ok_or_else(|| CanteenError::Internal("order did not encode as an object".into()))
    }
}

/// Checkout and feedback flows for one session.
pub struct Checkout {
    cart: Cart,
    storage: Arc<dyn SessionStorage>,
    submitter: Arc<Submitter>,
    hours: OperatingHours,
}

impl Checkout {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        submitter: Arc<Submitter>,
        hours: OperatingHours,
    ) -> Self {
        Self {
            cart: Cart::new(storage.clone()),
            storage,
            submitter,
            hours,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn hours(&self) -> &OperatingHours {
        &self.hours
    }

    /// Submits the cart for `customer`.
    ///
    /// The order is saved as the last order before it is sent; the cart is
    /// only cleared once the submission succeeds.
    pub async fn place_order(&self, customer: &Customer) -> Result<Value, CanteenError> {
        let order = self.cart.current();
        if order.is_empty() {
            return Err(CanteenError::Order("No items in order".into()));
        }
        customer.check()?;

        let placed = PlacedOrder {
            name: customer.name.clone(),
            room: customer.room.clone(),
            mobile: customer.mobile.clone(),
            order: order.description(),
            total: order.total,
            items: order.items,
            timestamp: self.hours.local_timestamp(Utc::now()),
        };
        write_json(self.storage.as_ref(), LAST_ORDER_KEY, &placed)?;

        let response = self.submitter.submit(placed.to_payload()?).await?;
        self.cart.clear()?;
        info!(total = placed.total, lines = placed.items.len(), "order placed");
        Ok(response)
    }

    /// Sends free-text feedback.
    pub async fn submit_feedback(&self, text: &str) -> Result<Value, CanteenError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CanteenError::Order("Please enter your feedback".into()));
        }
        let payload = Payload::new()
            .with("feedback", text)
            .with("timestamp", self.hours.local_timestamp(Utc::now()));
        self.submitter.submit(payload).await
    }

    /// The most recently placed order, if any.
    pub fn last_order(&self) -> Option<PlacedOrder> {
        read_json(self.storage.as_ref(), LAST_ORDER_KEY)
    }
}

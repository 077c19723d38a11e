// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of one canteen session: storage, ledgers, submitter, checkout.

use std::sync::Arc;
use std::time::Duration;

use canteen_config::CanteenConfig;
use canteen_core::{CanteenError, SessionStorage, Transport};
use canteen_order::{Checkout, Menu, Order, OperatingHours, load_menu};
use canteen_storage::{FileSessionStorage, SubmissionLedgers};
use canteen_submit::{Diagnostics, HttpTransport, Submitter, SweepReport};
use tokio::task::JoinHandle;
use tracing::debug;

/// Everything a command needs for the lifetime of the process.
pub struct App {
    pub config: CanteenConfig,
    pub menu: Menu,
    pub hours: OperatingHours,
    pub submitter: Arc<Submitter>,
    pub diagnostics: Diagnostics,
    pub checkout: Checkout,
}

impl App {
    /// Builds the app with the HTTP transport, the session file and the
    /// configured menu source.
    pub async fn new(config: CanteenConfig) -> Result<Self, CanteenError> {
        let transport = HttpTransport::from_config(&config.submission)?;
        let storage = FileSessionStorage::open(&config.session.storage_path)?;
        let menu = load_menu(&config.menu.source).await;
        Ok(Self::with_parts(
            config,
            Arc::new(transport),
            Arc::new(storage),
            menu,
        ))
    }

    pub fn with_parts(
        config: CanteenConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SessionStorage>,
        menu: Menu,
    ) -> Self {
        let ledgers = SubmissionLedgers::in_session(
            storage.clone(),
            config.session.success_capacity,
            config.session.failure_capacity,
        );
        let submitter = Arc::new(Submitter::new(
            transport,
            config.submission.clone(),
            ledgers,
        ));
        let hours = OperatingHours::from_config(&config.shop);
        debug!(menu_items = menu.len(), "session ready");

        Self {
            diagnostics: Diagnostics::new(submitter.clone()),
            checkout: Checkout::new(storage, submitter.clone(), hours),
            submitter,
            hours,
            menu,
            config,
        }
    }

    /// Schedules the once-per-session retry sweep.
    pub fn schedule_retry_sweep(&self) -> JoinHandle<SweepReport> {
        let delay = Duration::from_millis(self.config.session.retry_sweep_delay_ms);
        self.submitter.spawn_retry_sweep(delay)
    }

    /// Adds `id[:quantity]` item arguments to the cart.
    pub fn fill_cart(&self, args: &[String]) -> Result<Order, CanteenError> {
        let mut order = self.checkout.cart().current();
        for arg in args {
            let (id, quantity) = parse_item_arg(arg)?;
            let item = self
                .menu
                .find(id)
                .ok_or_else(|| CanteenError::Order(format!("item {id} is not on the menu")))?;
            for _ in 0..quantity {
                order = self.checkout.cart().add_item(item)?;
            }
        }
        Ok(order)
    }
}

/// Parses `5` or `5:2` into an item id and a quantity of at least one.
pub fn parse_item_arg(arg: &str) -> Result<(&str, u32), CanteenError> {
    let (id, quantity) = match arg.split_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| CanteenError::Order(format!("invalid quantity in `{arg}`")))?;
            (id, quantity)
        }
        None => (arg, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(CanteenError::Order(format!("missing item id in `{arg}`")));
    }
    Ok((id, quantity))
}

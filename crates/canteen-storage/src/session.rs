// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session storage and JSON helpers over any [`SessionStorage`].

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use canteen_core::{CanteenError, SessionStorage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Current cart: `{items, total}`.
pub const ORDER_KEY: &str = "order";
/// Most recently submitted order, kept for invoice regeneration.
pub const LAST_ORDER_KEY: &str = "lastOrder";
pub const SUCCESS_LEDGER_KEY: &str = "successful_submissions";
pub const FAILURE_LEDGER_KEY: &str = "failed_submissions";

/// Session storage that lives exactly as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CanteenError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), CanteenError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), CanteenError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// Reads and decodes a JSON value.
///
/// Missing keys, storage errors and undecodable JSON all come back as
/// `None`; the latter two are logged.
pub fn read_json<T: DeserializeOwned>(storage: &dyn SessionStorage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "session storage read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding undecodable session value");
            None
        }
    }
}

/// Encodes and writes a JSON value.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn SessionStorage,
    key: &str,
    value: &T,
) -> Result<(), CanteenError> {
    let text = serde_json::to_string(value).map_err(|e| CanteenError::Storage {
        message: format!("failed to encode `{key}`: {e}"),
        source: Some(Box::new(e)),
    })?;
    storage.set_item(key, text)
}

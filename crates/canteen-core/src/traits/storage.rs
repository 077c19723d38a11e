// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-scoped key/value storage.

use crate::error::CanteenError;

/// String key/value storage that lives as long as one session.
///
/// Values are serialized JSON documents. Callers treat read errors and
/// undecodable values as "no data".
pub trait SessionStorage: Send + Sync + 'static {
    fn get_item(&self, key: &str) -> Result<Option<String>, CanteenError>;

    fn set_item(&self, key: &str, value: String) -> Result<(), CanteenError>;

    fn remove_item(&self, key: &str) -> Result<(), CanteenError>;
}

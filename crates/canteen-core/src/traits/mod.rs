// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the submission core and its collaborators.
//!
//! The transport is async (`#[async_trait]` for dynamic dispatch); session
//! storage and ledgers are synchronous so that a read-modify-write never
//! spans a suspension point.

pub mod ledger;
pub mod storage;
pub mod transport;

pub use ledger::LedgerStore;
pub use storage::SessionStorage;
pub use transport::Transport;

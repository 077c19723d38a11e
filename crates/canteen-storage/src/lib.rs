// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session storage for Night Canteen.
//!
//! Session storage holds the cart, the last submitted order, and the two
//! bounded submission ledgers. [`FileSessionStorage`] keeps them in a JSON
//! file so queued failures outlive the process; [`MemorySessionStorage`]
//! lives only as long as the process and backs tests.

pub mod file;
pub mod ledger;
pub mod session;

pub use file::FileSessionStorage;
pub use ledger::{BoundedLedger, SubmissionLedgers};
pub use session::{
    FAILURE_LEDGER_KEY, LAST_ORDER_KEY, MemorySessionStorage, ORDER_KEY, SUCCESS_LEDGER_KEY,
    read_json, write_json,
};

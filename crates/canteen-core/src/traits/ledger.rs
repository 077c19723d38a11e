// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded submission ledger trait.

use crate::types::SubmissionRecord;

/// An append-only, capacity-bounded list of submission records.
///
/// None of these operations fail: storage problems are logged by the
/// implementation and the ledger behaves as if it were empty.
pub trait LedgerStore: Send + Sync + 'static {
    /// Returns every record, oldest first.
    fn read_all(&self) -> Vec<SubmissionRecord>;

    /// Appends a record, evicting the oldest entries beyond capacity.
    fn append_bounded(&self, record: SubmissionRecord);

    /// Replaces the whole ledger in one write.
    fn replace_all(&self, records: Vec<SubmissionRecord>);

    /// Maximum number of records retained.
    fn capacity(&self) -> usize;
}

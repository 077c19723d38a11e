// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded submission ledgers kept in session storage.
//!
//! Each ledger is one JSON array under one storage key. Appends read the
//! array, push, trim the oldest entries beyond capacity, and write it back
//! while holding the ledger's lock, so concurrent appends cannot lose
//! records. Storage failures never propagate: they are logged and the
//! ledger behaves as empty.

use std::sync::{Arc, Mutex, PoisonError};

use canteen_core::{LedgerStore, SessionStorage, SubmissionRecord};
use tracing::{debug, warn};

use crate::session::{FAILURE_LEDGER_KEY, SUCCESS_LEDGER_KEY, read_json, write_json};

/// A ring buffer of [`SubmissionRecord`]s stored under a single key.
pub struct BoundedLedger {
    storage: Arc<dyn SessionStorage>,
    key: String,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl BoundedLedger {
    pub fn new(storage: Arc<dyn SessionStorage>, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            capacity,
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Vec<SubmissionRecord> {
        read_json(self.storage.as_ref(), &self.key).unwrap_or_default()
    }

    fn store(&self, records: &[SubmissionRecord]) {
        if let Err(e) = write_json(self.storage.as_ref(), &self.key, records) {
            warn!(key = %self.key, error = %e, "failed to write submission ledger");
        }
    }
}

impl LedgerStore for BoundedLedger {
    fn read_all(&self) -> Vec<SubmissionRecord> {
        self.load()
    }

    fn append_bounded(&self, record: SubmissionRecord) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.load();
        records.push(record);
        if records.len() > self.capacity {
            let evicted = records.len() - self.capacity;
            records.drain(..evicted);
            debug!(key = %self.key, evicted, "evicted oldest ledger entries");
        }
        self.store(&records);
    }

    fn replace_all(&self, mut records: Vec<SubmissionRecord>) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if records.len() > self.capacity {
            let excess = records.len() - self.capacity;
            records.drain(..excess);
        }
        self.store(&records);
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The success and failure ledgers of one session.
#[derive(Clone)]
pub struct SubmissionLedgers {
    pub successes: Arc<dyn LedgerStore>,
    pub failures: Arc<dyn LedgerStore>,
}

impl SubmissionLedgers {
    /// Builds both ledgers over the given storage under their standard keys.
    pub fn in_session(
        storage: Arc<dyn SessionStorage>,
        success_capacity: usize,
        failure_capacity: usize,
    ) -> Self {
        Self {
            successes: Arc::new(BoundedLedger::new(
                storage.clone(),
                SUCCESS_LEDGER_KEY,
                success_capacity,
            )),
            failures: Arc::new(BoundedLedger::new(
                storage,
                FAILURE_LEDGER_KEY,
                failure_capacity,
            )),
        }
    }
}

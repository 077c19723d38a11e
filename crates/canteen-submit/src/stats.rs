// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission statistics and the diagnostics handle.

use std::fmt;
use std::sync::Arc;

use canteen_config::SubmissionConfig;
use canteen_storage::SubmissionLedgers;
use serde::Serialize;

use crate::submitter::{Submitter, SweepReport};

/// Counts derived from the two session ledgers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubmissionStats {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
    /// `successful / total`, or 0 when nothing has been submitted.
    pub success_rate: f64,
}

impl SubmissionStats {
    pub fn from_ledgers(ledgers: &SubmissionLedgers) -> Self {
        let successful = ledgers.successes.read_all().len();
        let failed = ledgers.failures.read_all().len();
        let total = successful + failed;
        let success_rate = if total == 0 {
            0.0
        } else {
            successful as f64 / total as f64
        };
        Self {
            successful,
            failed,
            total,
            success_rate,
        }
    }
}

impl fmt::Display for SubmissionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} successful, {} failed, {} total ({:.0}% success)",
            self.successful,
            self.failed,
            self.total,
            self.success_rate * 100.0
        )
    }
}

/// Read-mostly view of a [`Submitter`] for operators.
#[derive(Clone)]
pub struct Diagnostics {
    submitter: Arc<Submitter>,
}

impl Diagnostics {
    pub fn new(submitter: Arc<Submitter>) -> Self {
        Self { submitter }
    }

    pub fn stats(&self) -> SubmissionStats {
        SubmissionStats::from_ledgers(self.submitter.ledgers())
    }

    /// Runs a retry sweep now.
    pub async fn retry_failed(&self) -> SweepReport {
        self.submitter.retry_failed().await
    }

    /// The effective submission configuration.
    pub fn config(&self) -> &SubmissionConfig {
        self.submitter.config()
    }
}

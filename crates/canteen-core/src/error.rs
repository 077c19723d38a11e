// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Night Canteen.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use crate::types::SubmissionKind;

/// Phrases that mark an HTTP error as permanent even when its status code
/// would otherwise be retried. Matched case-insensitively.
pub const NON_RETRYABLE_PHRASES: &[&str] = &[
    "Invalid form data",
    "Validation failed",
    "Unauthorized",
    "Forbidden",
];

/// How a failed submission attempt should be treated by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Worth retrying after a backoff delay.
    Transient,
    /// Retrying the same endpoint will not help.
    Permanent,
    /// Every attempt and every fallback endpoint has been used up.
    Exhausted,
}

/// The primary error type used across the canteen crates.
#[derive(Debug, Error)]
pub enum CanteenError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Session storage errors (unavailable backend, unserializable value).
    #[error("storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The payload failed structural or format checks and was never sent.
    #[error("Validation failed: {}", .issues.join("; "))]
    Validation { issues: Vec<String> },

    /// The endpoint answered with a non-OK status.
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    /// The request never produced a response (DNS, connect, reset).
    #[error("network error: {message}")]
    Network {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single attempt exceeded its time budget and was cancelled.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// All primary attempts and all fallback endpoints failed.
    #[error(
        "failed to submit {kind} after {attempts} {}. Last error: {last_error}",
        attempt_noun(.attempts)
    )]
    Exhausted {
        kind: SubmissionKind,
        attempts: u32,
        last_error: Box<CanteenError>,
    },

    /// The menu could not be fetched or parsed.
    #[error("menu error: {message}")]
    Menu {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cart or checkout precondition failures (empty cart, missing fields).
    #[error("order error: {0}")]
    Order(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CanteenError {
    /// Classifies this error for the retry loop.
    ///
    /// Network failures and timeouts are transient. HTTP 400, 401, 403 and
    /// 422 are permanent, as is any HTTP error whose reason text contains
    /// one of [`NON_RETRYABLE_PHRASES`]. Other HTTP statuses are transient.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CanteenError::Network { .. } | CanteenError::Timeout { .. } => FailureKind::Transient,
            CanteenError::Http { status, reason } => {
                if matches!(status, 400 | 401 | 403 | 422) || mentions_non_retryable(reason) {
                    FailureKind::Permanent
                } else {
                    FailureKind::Transient
                }
            }
            CanteenError::Exhausted { .. } => FailureKind::Exhausted,
            CanteenError::Config(_)
            | CanteenError::Storage { .. }
            | CanteenError::Validation { .. }
            | CanteenError::Menu { .. }
            | CanteenError::Order(_)
            | CanteenError::Internal(_) => FailureKind::Permanent,
        }
    }

    /// Returns true when another attempt against the same endpoint may succeed.
    pub fn is_retryable(&self) -> bool {
        self.failure_kind() == FailureKind::Transient
    }
}

fn attempt_noun(attempts: &u32) -> &'static str {
    if *attempts == 1 { "attempt" } else { "attempts" }
}

/// Case-insensitive check of `text` against [`NON_RETRYABLE_PHRASES`].
pub fn mentions_non_retryable(text: &str) -> bool {
    let lowered = text.to_lowercase();
    NON_RETRYABLE_PHRASES
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()))
}

// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural and format checks applied before a payload may be sent.

use std::sync::LazyLock;

use canteen_core::types::is_truthy;
use canteen_core::{CanteenError, Payload};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("mobile pattern is a valid regex"));

/// Fields every order must carry as non-blank strings.
pub const REQUIRED_ORDER_FIELDS: [&str; 3] = ["name", "room", "mobile"];

/// One reason a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("feedback must be non-empty text")]
    BlankFeedback,

    #[error("missing or invalid required field: {0}")]
    MissingField(&'static str),

    #[error("invalid mobile number format")]
    InvalidMobile,

    #[error("order must contain at least one item")]
    EmptyItems,

    #[error("invalid total amount")]
    InvalidTotal,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Vec<ValidationIssue>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Validation::Valid => &[],
            Validation::Invalid(issues) => issues.as_slice(),
        }
    }

    /// Converts an invalid outcome into a non-retryable [`CanteenError::Validation`].
    pub fn into_result(self) -> Result<(), CanteenError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(issues) => Err(CanteenError::Validation {
                issues: issues.iter().map(ToString::to_string).collect(),
            }),
        }
    }
}

/// Checks a payload as feedback (if it carries truthy `feedback`) or as an order.
///
/// Order checks are collected rather than stopping at the first failure.
pub fn validate(payload: &Payload) -> Validation {
    if payload.is_truthy("feedback") {
        let ok = payload
            .get_str("feedback")
            .is_some_and(|text| !text.trim().is_empty());
        return if ok {
            Validation::Valid
        } else {
            Validation::Invalid(vec![ValidationIssue::BlankFeedback])
        };
    }

    let mut issues = Vec::new();

    for field in REQUIRED_ORDER_FIELDS {
        let present = payload
            .get_str(field)
            .is_some_and(|value| !value.trim().is_empty());
        if !present {
            issues.push(ValidationIssue::MissingField(field));
        }
    }

    if let Some(mobile) = payload.get_str("mobile")
        && !mobile.trim().is_empty()
        && !is_valid_mobile(mobile)
    {
        issues.push(ValidationIssue::InvalidMobile);
    }

    if let Some(items) = payload.get("items")
        && is_truthy(items)
        && !matches!(items, Value::Array(list) if !list.is_empty())
    {
        issues.push(ValidationIssue::EmptyItems);
    }

    if let Some(total) = payload.get("total") {
        let positive = total.as_f64().is_some_and(|t| t > 0.0);
        if !positive {
            issues.push(ValidationIssue::InvalidTotal);
        }
    }

    if issues.is_empty() {
        Validation::Valid
    } else {
        Validation::Invalid(issues)
    }
}

/// Removes every whitespace character from a phone number.
pub fn normalize_mobile(mobile: &str) -> String {
    mobile.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Exactly ten ASCII digits once whitespace is removed.
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_PATTERN.is_match(&normalize_mobile(mobile))
}

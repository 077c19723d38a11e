// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interpretation of successful endpoint responses.
//!
//! Spreadsheet web apps answer with JSON, JSON served as `text/plain`, or
//! free text. An OK status already means the row was accepted, so nothing
//! here can turn a delivered submission into a failure.

use canteen_core::{RawResponse, ResponseBody};
use serde_json::{Value, json};
use tracing::warn;

/// Message used when the response body cannot be read or parsed.
pub const DEFAULT_ACK_MESSAGE: &str = "Order submitted successfully";

/// Normalizes an OK response into a JSON value.
pub fn interpret(response: &RawResponse) -> Value {
    let body = match &response.body {
        ResponseBody::Bytes(bytes) => bytes,
        ResponseBody::Unreadable(reason) => {
            warn!(reason = %reason, "failed to read response body");
            return default_ack();
        }
    };

    let declared_json = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));

    if declared_json {
        return serde_json::from_slice(body).unwrap_or_else(|e| {
            warn!(error = %e, "failed to parse JSON response");
            default_ack()
        });
    }

    let text = String::from_utf8_lossy(body);
    serde_json::from_str(&text).unwrap_or_else(|_| json!({ "success": true, "message": text }))
}

fn default_ack() -> Value {
    json!({ "success": true, "message": DEFAULT_ACK_MESSAGE })
}

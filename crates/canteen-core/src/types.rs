// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the submission, storage, and order crates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// A submission payload: field name to JSON value.
///
/// Orders carry `name`, `room`, `mobile`, `order`, `total`, `items` and
/// `timestamp`; feedback carries `feedback` and `timestamp`. The payload is
/// kept as a loose map because the remote endpoint accepts arbitrary fields
/// and the validator reports on whatever shape it is handed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value, returning `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`Payload::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the field as a string slice if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns true if the field is present and truthy in the loose sense
    /// the front end used: not null, not false, not zero, not empty string.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Classifies the payload as feedback or order.
    pub fn kind(&self) -> SubmissionKind {
        if self.is_truthy("feedback") {
            SubmissionKind::Feedback
        } else {
            SubmissionKind::Order
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// JSON truthiness: everything except `null`, `false`, `0`, `NaN` and `""`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// What a submission was about.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    #[default]
    Order,
    Feedback,
}

/// One entry in a submission ledger.
///
/// Success entries carry only the timestamp, kind and outcome. Failure
/// entries additionally hold the exact enriched payload that was attempted
/// and the number of primary attempts spent on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// ISO 8601 UTC timestamp of when the record was written.
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub kind: SubmissionKind,
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl SubmissionRecord {
    /// Record a delivered submission.
    pub fn success(kind: SubmissionKind) -> Self {
        Self {
            timestamp: iso_timestamp(),
            kind,
            success: true,
            data: None,
            attempts: None,
        }
    }

    /// Record an undeliverable submission for later replay.
    pub fn failure(data: Payload, attempts: u32) -> Self {
        Self {
            timestamp: iso_timestamp(),
            kind: data.kind(),
            success: false,
            data: Some(data),
            attempts: Some(attempts),
        }
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn iso_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// A single multipart form field as sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body of a raw response, as far as the transport managed to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Bytes(Vec<u8>),
    /// The status line arrived but reading the body failed.
    Unreadable(String),
}

/// An uninterpreted HTTP response handed back by a [`crate::Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

impl RawResponse {
    /// Builds a response with a readable body and no reason phrase.
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            content_type: content_type.map(str::to_string),
            body: ResponseBody::Bytes(body.into()),
        }
    }

    /// Sets the reason phrase that accompanies the status line.
    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// True for any 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The delivery success test: status 200 or the ok flag.
    pub fn is_success(&self) -> bool {
        self.status == 200 || self.ok()
    }
}

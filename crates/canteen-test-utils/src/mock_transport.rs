// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted transport for deterministic submission tests.
//!
//! `MockTransport` implements `Transport` with queued replies, so retry,
//! fallback and sweep behavior can be exercised without a network.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use canteen_core::{CanteenError, FormField, RawResponse, Transport};

/// One scripted outcome of a `post` call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Hand back this response as-is.
    Respond(RawResponse),
    /// Fail with [`CanteenError::Timeout`] immediately.
    Timeout,
    /// Fail with [`CanteenError::Network`].
    Network(String),
}

impl MockReply {
    /// A 200 response with a JSON body.
    pub fn ok_json(body: serde_json::Value) -> Self {
        Self::Respond(
            RawResponse::new(200, Some("application/json"), body.to_string())
                .with_status_text("OK"),
        )
    }

    /// A 200 response with a plain-text body.
    pub fn ok_text(body: &str) -> Self {
        Self::Respond(RawResponse::new(200, Some("text/plain"), body).with_status_text("OK"))
    }

    /// A non-OK response with the given reason phrase and an empty body.
    pub fn status(status: u16, reason: &str) -> Self {
        Self::Respond(RawResponse::new(status, Some("text/plain"), "").with_status_text(reason))
    }

    fn into_result(self) -> Result<RawResponse, CanteenError> {
        match self {
            MockReply::Respond(response) => Ok(response),
            MockReply::Timeout => Err(CanteenError::Timeout {
                duration: Duration::from_secs(10),
            }),
            MockReply::Network(message) => Err(CanteenError::Network {
                message,
                source: None,
            }),
        }
    }
}

/// A call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub fields: Vec<FormField>,
}

impl RecordedCall {
    /// Value of the named form field, if it was sent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

struct Script {
    by_endpoint: HashMap<String, VecDeque<MockReply>>,
    any_endpoint: VecDeque<MockReply>,
    default_reply: MockReply,
    calls: Vec<RecordedCall>,
}

/// A transport that answers from scripted queues and records every call.
///
/// Replies queued for a specific endpoint are used first, then the shared
/// queue, then the default reply (a 200 JSON success unless changed).
pub struct MockTransport {
    script: Mutex<Script>,
}

impl MockTransport {
    fn from_parts(any_endpoint: VecDeque<MockReply>, default_reply: MockReply) -> Self {
        Self {
            script: Mutex::new(Script {
                by_endpoint: HashMap::new(),
                any_endpoint,
                default_reply,
                calls: Vec::new(),
            }),
        }
    }

    /// Create a mock that accepts everything.
    pub fn new() -> Self {
        Self::from_parts(VecDeque::new(), default_success())
    }

    /// Create a mock pre-loaded with replies for any endpoint.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self::from_parts(VecDeque::from(replies), default_success())
    }

    /// Create a mock whose every unscripted call gets `reply`.
    pub fn always(reply: MockReply) -> Self {
        Self::from_parts(VecDeque::new(), reply)
    }

    /// Queue a reply for any endpoint.
    pub async fn push(&self, reply: MockReply) {
        self.script.lock().await.any_endpoint.push_back(reply);
    }

    /// Queue a reply for one endpoint.
    pub async fn push_for(&self, endpoint: &str, reply: MockReply) {
        self.script
            .lock()
            .await
            .by_endpoint
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Replace the reply used once the queues are empty.
    pub async fn set_default(&self, reply: MockReply) {
        self.script.lock().await.default_reply = reply;
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.script.lock().await.calls.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.script.lock().await.calls.len()
    }

    /// Endpoints hit so far, in call order.
    pub async fn endpoints(&self) -> Vec<String> {
        self.script
            .lock()
            .await
            .calls
            .iter()
            .map(|c| c.endpoint.clone())
            .collect()
    }
}

fn default_success() -> MockReply {
    MockReply::ok_json(serde_json::json!({"result": "success"}))
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    async fn post(&self, endpoint: &str, fields: &[FormField]) -> Result<RawResponse, CanteenError> {
        let mut guard = self.script.lock().await;
        let script = &mut *guard;
        script.calls.push(RecordedCall {
            endpoint: endpoint.to_string(),
            fields: fields.to_vec(),
        });

        let reply = script
            .by_endpoint
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .or_else(|| script.any_endpoint.pop_front())
            .unwrap_or_else(|| script.default_reply.clone());
        debug!(endpoint, ?reply, "mock transport reply");
        reply.into_result()
    }
}

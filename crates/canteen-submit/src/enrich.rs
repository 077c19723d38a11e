// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata stamped onto every payload before its first delivery attempt.

use canteen_config::SubmissionConfig;
use canteen_core::Payload;
use canteen_core::types::iso_timestamp;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Adds `timestamp`, `userAgent`, `sessionId` and `source` to a payload.
#[derive(Debug, Clone)]
pub struct Enricher {
    user_agent: String,
    source_tag: String,
}

impl Enricher {
    pub fn new(user_agent: impl Into<String>, source_tag: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            source_tag: source_tag.into(),
        }
    }

    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self::new(config.user_agent.clone(), config.source_tag.clone())
    }

    /// Returns the payload with metadata fields set, overwriting any
    /// caller-supplied values for those keys.
    pub fn enrich(&self, mut payload: Payload) -> Payload {
        payload.insert("timestamp", iso_timestamp());
        payload.insert("userAgent", self.user_agent.clone());
        payload.insert("sessionId", generate_session_id());
        payload.insert("source", self.source_tag.clone());
        payload
    }
}

/// `session_<unix millis>_<9 random base-36 chars>`, fresh on every call.
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!(
        "session_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        suffix
    )
}

// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Night Canteen integration tests.
//!
//! # Components
//!
//! - [`MockTransport`] - scripted transport that records every call
//! - [`test_submission_config`] - submission settings pointed at fake endpoints

pub mod mock_transport;

use canteen_config::SubmissionConfig;

pub use mock_transport::{MockReply, MockTransport, RecordedCall};

/// Primary endpoint used by [`test_submission_config`].
pub const TEST_ENDPOINT: &str = "https://primary.test/exec";

/// Default submission settings (3 attempts, 1000 ms base delay) aimed at
/// [`TEST_ENDPOINT`] with the given fallbacks.
pub fn test_submission_config(fallbacks: &[&str]) -> SubmissionConfig {
    SubmissionConfig {
        endpoint: TEST_ENDPOINT.to_string(),
        fallback_endpoints: fallbacks.iter().map(|e| e.to_string()).collect(),
        ..SubmissionConfig::default()
    }
}

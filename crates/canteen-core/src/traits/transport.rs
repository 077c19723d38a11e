// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for delivering one encoded payload to one endpoint.

use async_trait::async_trait;

use crate::error::CanteenError;
use crate::types::{FormField, RawResponse};

/// Performs a single bounded-duration POST.
///
/// Implementations enforce their own per-call timeout and report it as
/// [`CanteenError::Timeout`]. Connection-level failures are reported as
/// [`CanteenError::Network`]. Non-OK statuses are *not* errors at this
/// layer: the raw response is returned and the caller decides.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Human-readable name used in log fields.
    fn name(&self) -> &str;

    /// POSTs `fields` as a multipart form to `endpoint`.
    async fn post(&self, endpoint: &str, fields: &[FormField]) -> Result<RawResponse, CanteenError>;
}

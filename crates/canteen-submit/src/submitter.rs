// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The submission orchestrator.
//!
//! [`Submitter::submit`] validates and enriches a payload, then delivers it:
//! up to `max_retries` attempts against the primary endpoint with
//! exponential backoff, followed by one attempt per fallback endpoint.
//! Undeliverable payloads land in the failure ledger, and
//! [`Submitter::retry_failed`] replays them later.

use std::sync::Arc;
use std::time::Duration;

use canteen_config::SubmissionConfig;
use canteen_core::{
    CanteenError, FormField, Payload, RawResponse, ResponseBody, SubmissionKind, SubmissionRecord,
    Transport,
};
use canteen_storage::SubmissionLedgers;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::enrich::Enricher;
use crate::form::encode_form;
use crate::response::interpret;
use crate::validator::validate;

/// Longest slice of an error body written to the log.
const MAX_LOGGED_BODY: usize = 200;

/// Outcome of one retry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Records whose payload was sent again.
    pub replayed: usize,
    /// Replayed records that were delivered and dropped from the ledger.
    pub recovered: usize,
    /// Records without a stored payload, kept as they were.
    pub skipped: usize,
    /// Failure ledger size after the sweep.
    pub remaining: usize,
}

/// Delivers payloads with retry, backoff, fallback and ledger bookkeeping.
pub struct Submitter {
    transport: Arc<dyn Transport>,
    config: SubmissionConfig,
    ledgers: SubmissionLedgers,
    enricher: Enricher,
    /// Serializes whole submissions and whole sweeps.
    lane: Mutex<()>,
}

impl Submitter {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: SubmissionConfig,
        ledgers: SubmissionLedgers,
    ) -> Self {
        let enricher = Enricher::from_config(&config);
        Self {
            transport,
            config,
            ledgers,
            enricher,
            lane: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    pub fn ledgers(&self) -> &SubmissionLedgers {
        &self.ledgers
    }

    /// Validates, enriches and delivers `payload`.
    ///
    /// Returns the interpreted endpoint response. Invalid payloads fail with
    /// [`CanteenError::Validation`] and are never sent; payloads that no
    /// endpoint accepted are queued in the failure ledger and fail with
    /// [`CanteenError::Exhausted`].
    pub async fn submit(&self, payload: Payload) -> Result<Value, CanteenError> {
        if let Err(e) = validate(&payload).into_result() {
            warn!(error = %e, "rejected invalid submission");
            return Err(e);
        }

        let _lane = self.lane.lock().await;
        let enriched = self.enricher.enrich(payload);
        let kind = enriched.kind();
        info!(kind = %kind, "submitting");

        match self.deliver(&enriched).await {
            Ok(response) => Ok(response),
            Err(err) => {
                let attempts = match &err {
                    CanteenError::Exhausted { attempts, .. } => *attempts,
                    _ => 0,
                };
                self.ledgers
                    .failures
                    .append_bounded(SubmissionRecord::failure(enriched, attempts));
                warn!(kind = %kind, attempts, error = %err, "submission queued for retry");
                Err(err)
            }
        }
    }

    /// Sends an already-enriched payload through the primary retry loop and
    /// then the fallbacks. Records successes but never failures.
    async fn deliver(&self, payload: &Payload) -> Result<Value, CanteenError> {
        let kind = payload.kind();
        let fields = encode_form(payload);
        let max_retries = self.config.max_retries.max(1);
        let base_delay = Duration::from_millis(self.config.retry_delay_ms);

        let mut attempts = 0;
        let mut last_error = None;

        for attempt in 1..=max_retries {
            attempts = attempt;
            match self.attempt(&self.config.endpoint, &fields).await {
                Ok(response) => {
                    info!(attempt, kind = %kind, "submission delivered");
                    return Ok(self.record_success(kind, &response));
                }
                Err(e) => {
                    warn!(attempt, max_retries, endpoint = %self.config.endpoint, error = %e, "submission attempt failed");
                    let permanent = !e.is_retryable();
                    last_error = Some(e);
                    if permanent {
                        warn!(attempt, "non-retryable error, skipping remaining attempts");
                        break;
                    }
                    if attempt < max_retries {
                        let delay = backoff_delay(base_delay, attempt);
                        debug!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        for endpoint in &self.config.fallback_endpoints {
            info!(endpoint = %endpoint, "trying fallback endpoint");
            match self.attempt(endpoint, &fields).await {
                Ok(response) => {
                    info!(endpoint = %endpoint, kind = %kind, "submission delivered via fallback");
                    return Ok(self.record_success(kind, &response));
                }
                Err(e) => warn!(endpoint = %endpoint, error = %e, "fallback endpoint failed"),
            }
        }

        Err(CanteenError::Exhausted {
            kind,
            attempts,
            last_error: Box::new(last_error.unwrap_or_else(|| {
                CanteenError::Internal("no delivery attempt was made".into())
            })),
        })
    }

    /// One transport call; a non-success status becomes [`CanteenError::Http`].
    ///
    /// The error reason is the status text alone. The body is logged but
    /// never classified.
    async fn attempt(&self, endpoint: &str, fields: &[FormField]) -> Result<RawResponse, CanteenError> {
        let response = self.transport.post(endpoint, fields).await?;
        if response.is_success() {
            return Ok(response);
        }

        let body = body_excerpt(&response);
        if !body.is_empty() {
            warn!(
                transport = self.transport.name(),
                endpoint,
                status = response.status,
                body = %body,
                "endpoint returned an error body"
            );
        }
        Err(CanteenError::Http {
            status: response.status,
            reason: http_reason(&response),
        })
    }

    fn record_success(&self, kind: SubmissionKind, response: &RawResponse) -> Value {
        self.ledgers
            .successes
            .append_bounded(SubmissionRecord::success(kind));
        interpret(response)
    }

    /// Replays every queued failure, in ledger order.
    ///
    /// Delivered records are dropped; the rest are kept unchanged and the
    /// failure ledger is rewritten once at the end. Stored payloads are sent
    /// exactly as they were first attempted.
    pub async fn retry_failed(&self) -> SweepReport {
        let _lane = self.lane.lock().await;
        let records = self.ledgers.failures.read_all();
        if records.is_empty() {
            debug!("no failed submissions to retry");
            return SweepReport::default();
        }

        info!(count = records.len(), "retrying failed submissions");
        let mut report = SweepReport::default();
        let mut retained = Vec::with_capacity(records.len());

        for record in records {
            let Some(data) = record.data.as_ref() else {
                debug!(timestamp = %record.timestamp, "failure record has no payload, keeping it");
                report.skipped += 1;
                retained.push(record);
                continue;
            };

            report.replayed += 1;
            match self.deliver(data).await {
                Ok(_) => {
                    info!(timestamp = %record.timestamp, "retried submission delivered");
                    report.recovered += 1;
                }
                Err(e) => {
                    warn!(timestamp = %record.timestamp, error = %e, "retry failed, keeping for later");
                    retained.push(record);
                }
            }
        }

        report.remaining = retained.len();
        self.ledgers.failures.replace_all(retained);
        info!(
            recovered = report.recovered,
            remaining = report.remaining,
            "retry sweep finished"
        );
        report
    }

    /// Runs [`Submitter::retry_failed`] once after `delay` on the current runtime.
    pub fn spawn_retry_sweep(self: &Arc<Self>, delay: Duration) -> JoinHandle<SweepReport> {
        let submitter = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            submitter.retry_failed().await
        })
    }
}

/// `base * 2^(attempt - 1)`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor)
}

/// The status text, or a placeholder when the endpoint sent none.
fn http_reason(response: &RawResponse) -> String {
    if response.status_text.is_empty() {
        "Unknown Status".to_string()
    } else {
        response.status_text.clone()
    }
}

/// The first [`MAX_LOGGED_BODY`] characters of the body, trimmed.
fn body_excerpt(response: &RawResponse) -> String {
    match &response.body {
        ResponseBody::Bytes(bytes) => String::from_utf8_lossy(bytes)
            .trim()
            .chars()
            .take(MAX_LOGGED_BODY)
            .collect(),
        ResponseBody::Unreadable(_) => String::new(),
    }
}

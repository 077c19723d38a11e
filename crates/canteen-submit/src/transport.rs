// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`Transport`] that POSTs multipart forms under a timeout.

use std::time::Duration;

use async_trait::async_trait;
use canteen_config::SubmissionConfig;
use canteen_core::{CanteenError, FormField, RawResponse, ResponseBody, Transport};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use tracing::{debug, warn};

/// HTTP transport for the spreadsheet endpoint and its fallbacks.
///
/// Each call is wrapped in [`tokio::time::timeout`]; when it fires the
/// request future is dropped, which aborts the connection for that one
/// attempt only.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Builds a transport that sends `user_agent` and `Accept: application/json`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CanteenError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CanteenError::Network {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &SubmissionConfig) -> Result<Self, CanteenError> {
        Self::new(&config.user_agent, Duration::from_millis(config.timeout_ms))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, endpoint: &str, fields: &[FormField]) -> Result<RawResponse, CanteenError> {
        let form = fields
            .iter()
            .fold(Form::new(), |form, f| form.text(f.name.clone(), f.value.clone()));

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CanteenError::Network {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(endpoint, status = %status, "response received");

        let body = match response.bytes().await {
            Ok(bytes) => ResponseBody::Bytes(bytes.to_vec()),
            Err(e) => ResponseBody::Unreadable(e.to_string()),
        };

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn post(&self, endpoint: &str, fields: &[FormField]) -> Result<RawResponse, CanteenError> {
        match tokio::time::timeout(self.timeout, self.send(endpoint, fields)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(endpoint, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                Err(CanteenError::Timeout {
                    duration: self.timeout,
                })
            }
        }
    }
}

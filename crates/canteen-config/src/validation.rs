// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::CanteenConfig;

/// Validates a deserialized configuration, collecting every problem.
pub fn validate_config(config: &CanteenConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let submission = &config.submission;
    if !is_http_url(&submission.endpoint) {
        fail(format!(
            "submission.endpoint must be an http(s) URL, got `{}`",
            submission.endpoint
        ));
    }
    for (i, endpoint) in submission.fallback_endpoints.iter().enumerate() {
        if !is_http_url(endpoint) {
            fail(format!(
                "submission.fallback_endpoints[{i}] must be an http(s) URL, got `{endpoint}`"
            ));
        }
    }
    if submission.max_retries == 0 {
        fail("submission.max_retries must be at least 1".to_string());
    }
    if submission.timeout_ms == 0 {
        fail("submission.timeout_ms must be greater than 0".to_string());
    }
    if submission.source_tag.trim().is_empty() {
        fail("submission.source_tag must not be empty".to_string());
    }

    if config.session.success_capacity == 0 {
        fail("session.success_capacity must be at least 1".to_string());
    }
    if config.session.failure_capacity == 0 {
        fail("session.failure_capacity must be at least 1".to_string());
    }
    if config.session.storage_path.trim().is_empty() {
        fail("session.storage_path must not be empty".to_string());
    }

    if config.menu.source.trim().is_empty() {
        fail("menu.source must not be empty".to_string());
    }

    let shop = &config.shop;
    if shop.open_hour > 23 {
        fail(format!("shop.open_hour must be 0-23, got {}", shop.open_hour));
    }
    if shop.close_hour > 23 {
        fail(format!("shop.close_hour must be 0-23, got {}", shop.close_hour));
    }
    if shop.utc_offset_minutes.abs() > 14 * 60 {
        fail(format!(
            "shop.utc_offset_minutes must be within +/-840, got {}",
            shop.utc_offset_minutes
        ));
    }

    if !matches!(
        config.app.log_level.as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    ) {
        fail(format!(
            "app.log_level must be one of trace, debug, info, warn, error; got `{}`",
            config.app.log_level
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.len() > scheme.len() && value.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&CanteenConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_problem() {
        let mut config = CanteenConfig::default();
        config.submission.max_retries = 0;
        config.submission.fallback_endpoints = vec!["ftp://backup".into()];
        config.session.failure_capacity = 0;
        config.session.storage_path = " ".into();
        config.shop.open_hour = 24;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "got: {errors:?}");
    }

    #[test]
    fn bare_scheme_is_not_a_url() {
        assert!(!is_http_url("https://"));
        assert!(is_http_url("https://example.com/exec"));
        assert!(is_http_url("http://localhost:8080"));
    }
}

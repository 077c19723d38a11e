// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use std::io::Write;

use canteen_config::diagnostic::ConfigError;
use canteen_config::model::CanteenConfig;
use canteen_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use serial_test::serial;

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[app]
log_level = "debug"

[submission]
endpoint = "https://primary.example/exec"
fallback_endpoints = ["https://backup.example/orders"]
max_retries = 5
retry_delay_ms = 250
timeout_ms = 3000
user_agent = "kiosk/1"
source_tag = "hostel_b"

[session]
success_capacity = 20
failure_capacity = 8
retry_sweep_delay_ms = 500
storage_path = "/var/tmp/canteen/kiosk.json"

[menu]
source = "https://cdn.example/items.json"

[shop]
name = "Midnight Bites"
contact = "9000000000"
currency_symbol = "Rs."
open_hour = 21
close_hour = 2
utc_offset_minutes = 0
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.submission.endpoint, "https://primary.example/exec");
    assert_eq!(
        config.submission.fallback_endpoints,
        vec!["https://backup.example/orders"]
    );
    assert_eq!(config.submission.max_retries, 5);
    assert_eq!(config.submission.retry_delay_ms, 250);
    assert_eq!(config.submission.timeout_ms, 3000);
    assert_eq!(config.submission.user_agent, "kiosk/1");
    assert_eq!(config.submission.source_tag, "hostel_b");
    assert_eq!(config.session.success_capacity, 20);
    assert_eq!(config.session.failure_capacity, 8);
    assert_eq!(config.session.retry_sweep_delay_ms, 500);
    assert_eq!(config.session.storage_path, "/var/tmp/canteen/kiosk.json");
    assert_eq!(config.menu.source, "https://cdn.example/items.json");
    assert_eq!(config.shop.name, "Midnight Bites");
    assert_eq!(config.shop.open_hour, 21);
    assert_eq!(config.shop.close_hour, 2);
    assert_eq!(config.shop.utc_offset_minutes, 0);
}

#[test]
fn empty_toml_yields_documented_defaults() {
    let config = load_config_from_str("").expect("empty TOML uses defaults");
    assert_eq!(config.submission.max_retries, 3);
    assert_eq!(config.submission.retry_delay_ms, 1000);
    assert_eq!(config.submission.timeout_ms, 10_000);
    assert!(config.submission.fallback_endpoints.is_empty());
    assert_eq!(config.submission.source_tag, "night_canteen_app");
    assert_eq!(config.session.success_capacity, 10);
    assert_eq!(config.session.failure_capacity, 5);
    assert_eq!(config.session.retry_sweep_delay_ms, 2000);
    assert!(config.session.storage_path.ends_with("session.json"));
    assert_eq!(config.shop.open_hour, 22);
    assert_eq!(config.shop.close_hour, 1);
    assert_eq!(config.shop.utc_offset_minutes, 330);
}

#[test]
fn unknown_key_is_reported_with_suggestion() {
    let toml = r#"
[submission]
max_retires = 4
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "max_retires");
            assert_eq!(suggestion.as_deref(), Some("max_retries"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[submission]\nmax_retries = \"three\"\n").unwrap_err();
    assert!(
        matches!(errors[0], ConfigError::InvalidType { ref key, .. } if key == "submission.max_retries"),
        "got {errors:?}"
    );
}

#[test]
fn semantic_validation_runs_after_parse() {
    let errors =
        load_and_validate_str("[submission]\nendpoint = \"not-a-url\"\ntimeout_ms = 0\n")
            .unwrap_err();
    assert_eq!(errors.len(), 2, "got {errors:?}");
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
#[serial]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            "[submission]\nmax_retries = 2\n[shop]\nopen_hour = 20\n",
        )?;
        jail.set_env("CANTEEN_SUBMISSION_MAX_RETRIES", "7");
        jail.set_env("CANTEEN_SESSION_FAILURE_CAPACITY", "9");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.submission.max_retries, 7);
        assert_eq!(config.session.failure_capacity, 9);
        assert_eq!(config.shop.open_hour, 20);
        Ok(())
    });
}

#[test]
#[serial]
fn explicit_path_reports_unknown_key_in_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[shop]\nnaem = \"Typo Canteen\"").unwrap();

    let errors = load_and_validate_path(file.path()).unwrap_err();
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "naem");
            assert_eq!(suggestion.as_deref(), Some("name"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn default_config_round_trips_through_toml() {
    let defaults = CanteenConfig::default();
    let text = toml::to_string(&defaults).expect("defaults serialize");
    let parsed = load_and_validate_str(&text).expect("serialized defaults are valid");
    assert_eq!(parsed.submission, defaults.submission);
    assert_eq!(parsed.shop, defaults.shop);
}

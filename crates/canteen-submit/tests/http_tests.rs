// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end submission against wiremock endpoints over real HTTP.

use std::sync::Arc;

use canteen_config::SubmissionConfig;
use canteen_core::{CanteenError, Payload};
use canteen_storage::{MemorySessionStorage, SubmissionLedgers};
use canteen_submit::{HttpTransport, Submitter};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(endpoint: String, fallbacks: Vec<String>) -> SubmissionConfig {
    SubmissionConfig {
        endpoint,
        fallback_endpoints: fallbacks,
        retry_delay_ms: 10,
        timeout_ms: 2000,
        ..SubmissionConfig::default()
    }
}

fn submitter(config: SubmissionConfig) -> (Submitter, SubmissionLedgers) {
    let ledgers = SubmissionLedgers::in_session(Arc::new(MemorySessionStorage::new()), 10, 5);
    let transport = HttpTransport::from_config(&config).unwrap();
    (
        Submitter::new(Arc::new(transport), config, ledgers.clone()),
        ledgers,
    )
}

fn order() -> Payload {
    Payload::new()
        .with("name", "Asha")
        .with("room", "B-214")
        .with("mobile", "9876543210")
        .with("order", "Maggie Noodles 70gm (x1)")
        .with("total", 17)
        .with("items", json!([{"id": 2, "name": "Maggie Noodles 70gm", "price": 17, "quantity": 1}]))
}

#[tokio::test]
async fn retries_a_503_then_parses_json_acknowledgement() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/exec"))
        .and(body_string_contains("night_canteen_app"))
        .and(body_string_contains("Maggie Noodles 70gm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "success", "row": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let (submitter, ledgers) = submitter(config(format!("{}/exec", server.uri()), vec![]));
    let response = submitter.submit(order()).await.unwrap();

    assert_eq!(response, json!({"result": "success", "row": 7}));
    assert_eq!(ledgers.successes.read_all().len(), 1);
}

#[tokio::test]
async fn forbidden_primary_falls_back_to_backup() {
    let primary = MockServer::start().await;
    let backup = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&primary)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Row appended"))
        .expect(1)
        .mount(&backup)
        .await;

    let (submitter, ledgers) = submitter(config(primary.uri(), vec![backup.uri()]));
    let response = submitter.submit(order()).await.unwrap();

    assert_eq!(response, json!({"success": true, "message": "Row appended"}));
    assert!(ledgers.failures.read_all().is_empty());
}

#[tokio::test]
async fn persistent_server_errors_exhaust_and_queue() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Script error"))
        .expect(3)
        .mount(&server)
        .await;

    let (submitter, ledgers) = submitter(config(server.uri(), vec![]));
    let err = submitter.submit(order()).await.unwrap_err();

    match err {
        CanteenError::Exhausted {
            attempts,
            last_error,
            ..
        } => {
            assert_eq!(attempts, 3);
            assert_eq!(last_error.to_string(), "HTTP 500: Internal Server Error");
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
    assert_eq!(ledgers.failures.read_all().len(), 1);
}

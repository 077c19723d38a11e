// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the submission orchestrator and retry sweep.

use std::sync::Arc;
use std::time::Duration;

use canteen_core::{CanteenError, Payload, RawResponse, SubmissionKind, SubmissionRecord};
use canteen_storage::{MemorySessionStorage, SubmissionLedgers};
use canteen_submit::{Diagnostics, Submitter, SweepReport};
use canteen_test_utils::{MockReply, MockTransport, TEST_ENDPOINT, test_submission_config};
use serde_json::json;
use tokio::time::Instant;
use tracing_test::traced_test;

const BACKUP_A: &str = "https://backup-a.test/exec";
const BACKUP_B: &str = "https://backup-b.test/exec";

fn harness(transport: &Arc<MockTransport>, fallbacks: &[&str]) -> (Arc<Submitter>, SubmissionLedgers) {
    let ledgers = SubmissionLedgers::in_session(Arc::new(MemorySessionStorage::new()), 10, 5);
    let submitter = Submitter::new(
        transport.clone(),
        test_submission_config(fallbacks),
        ledgers.clone(),
    );
    (Arc::new(submitter), ledgers)
}

fn order(name: &str) -> Payload {
    Payload::new()
        .with("name", name)
        .with("room", "B-214")
        .with("mobile", "98765 43210")
        .with("order", "Coffee (x2)")
        .with("total", 6)
        .with("items", json!([{"id": 5, "name": "Coffee", "price": 3, "quantity": 2}]))
}

fn queued(name: &str) -> SubmissionRecord {
    let data = order(name)
        .with("sessionId", format!("session_1_{name}"))
        .with("source", "night_canteen_app");
    SubmissionRecord::failure(data, 3)
}

#[tokio::test(start_paused = true)]
async fn two_failures_then_success_backs_off_one_then_two_seconds() {
    let transport = Arc::new(MockTransport::with_replies(vec![
        MockReply::Network("connection reset".into()),
        MockReply::status(503, "Service Unavailable"),
    ]));
    let (submitter, ledgers) = harness(&transport, &[]);

    let start = Instant::now();
    let response = submitter.submit(order("Asha")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(response, json!({"result": "success"}));
    assert_eq!(transport.call_count().await, 3);
    assert!(
        elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3100),
        "expected 1000 + 2000 ms of backoff, waited {elapsed:?}"
    );
    assert_eq!(ledgers.successes.read_all().len(), 1);
    assert!(ledgers.failures.read_all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unauthorized_skips_retries_then_tries_fallbacks_in_order() {
    let transport = Arc::new(MockTransport::always(MockReply::status(401, "Unauthorized")));
    let (submitter, ledgers) = harness(&transport, &[BACKUP_A, BACKUP_B]);

    let start = Instant::now();
    let err = submitter.submit(order("Asha")).await.unwrap_err();

    assert_eq!(start.elapsed(), Duration::ZERO, "permanent errors must not back off");
    assert_eq!(
        transport.endpoints().await,
        vec![TEST_ENDPOINT, BACKUP_A, BACKUP_B]
    );
    match &err {
        CanteenError::Exhausted {
            kind,
            attempts,
            last_error,
        } => {
            assert_eq!(*kind, SubmissionKind::Order);
            assert_eq!(*attempts, 1);
            assert!(matches!(**last_error, CanteenError::Http { status: 401, .. }));
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }

    let failures = ledgers.failures.read_all();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].attempts, Some(1));
    assert!(ledgers.successes.read_all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn non_retryable_phrase_in_status_text_stops_retries() {
    let transport = Arc::new(MockTransport::new());
    transport
        .set_default(MockReply::status(500, "Invalid form data"))
        .await;
    let (submitter, _ledgers) = harness(&transport, &[]);

    let err = submitter.submit(order("Asha")).await.unwrap_err();
    assert_eq!(transport.call_count().await, 1);
    assert!(err.to_string().contains("after 1 attempt."), "got {err}");
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn phrase_in_error_body_is_logged_but_still_retried() {
    let transport = Arc::new(MockTransport::new());
    for _ in 0..2 {
        transport
            .push(MockReply::Respond(
                RawResponse::new(500, Some("text/plain"), "Validation failed: sheet locked")
                    .with_status_text("Internal Server Error"),
            ))
            .await;
    }
    let (submitter, ledgers) = harness(&transport, &[]);

    submitter.submit(order("Asha")).await.unwrap();

    assert_eq!(transport.call_count().await, 3);
    assert_eq!(ledgers.successes.read_all().len(), 1);
    assert!(logs_contain("endpoint returned an error body"));
    assert!(logs_contain("sheet locked"));
    assert!(logs_contain("mock-transport"));
}

#[tokio::test(start_paused = true)]
async fn fallback_success_is_recorded_as_success() {
    let transport = Arc::new(MockTransport::new());
    for _ in 0..3 {
        transport.push_for(TEST_ENDPOINT, MockReply::Timeout).await;
    }
    transport.push_for(BACKUP_A, MockReply::ok_text("Saved")).await;
    let (submitter, ledgers) = harness(&transport, &[BACKUP_A, BACKUP_B]);

    let response = submitter.submit(order("Asha")).await.unwrap();

    assert_eq!(response, json!({"success": true, "message": "Saved"}));
    assert_eq!(
        transport.endpoints().await,
        vec![TEST_ENDPOINT, TEST_ENDPOINT, TEST_ENDPOINT, BACKUP_A]
    );
    assert_eq!(ledgers.successes.read_all().len(), 1);
    assert!(ledgers.failures.read_all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn always_timing_out_queues_the_exact_enriched_payload() {
    let transport = Arc::new(MockTransport::always(MockReply::Timeout));
    let (submitter, ledgers) = harness(&transport, &[]);

    let err = submitter.submit(order("Asha")).await.unwrap_err();

    assert!(matches!(err, CanteenError::Exhausted { attempts: 3, .. }));
    assert!(err.to_string().contains("after 3 attempts"), "got {err}");
    assert_eq!(transport.call_count().await, 3);

    let failures = ledgers.failures.read_all();
    assert_eq!(failures.len(), 1);
    let record = &failures[0];
    assert!(!record.success);
    assert_eq!(record.kind, SubmissionKind::Order);
    assert_eq!(record.attempts, Some(3));

    let data = record.data.as_ref().expect("failure record keeps its payload");
    assert_eq!(data.get_str("name"), Some("Asha"));
    assert_eq!(data.get_str("source"), Some("night_canteen_app"));
    assert!(data.get_str("userAgent").is_some());

    let calls = transport.calls().await;
    let sent = &calls[0];
    assert_eq!(data.get_str("sessionId"), sent.field("sessionId"));
    assert_eq!(data.get_str("timestamp"), sent.field("timestamp"));
}

#[tokio::test]
async fn invalid_payload_is_never_sent() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, ledgers) = harness(&transport, &[BACKUP_A]);

    let err = submitter
        .submit(order("Asha").with("mobile", "12345"))
        .await
        .unwrap_err();

    assert!(matches!(err, CanteenError::Validation { .. }));
    assert!(!err.is_retryable());
    assert_eq!(transport.call_count().await, 0);
    assert!(ledgers.successes.read_all().is_empty());
    assert!(ledgers.failures.read_all().is_empty());
}

#[tokio::test]
async fn feedback_is_enriched_and_sent_as_form_fields() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, ledgers) = harness(&transport, &[]);

    let payload = Payload::new()
        .with("feedback", "More coffee at 2 AM please")
        .with("timestamp", "17/10/2026, 11:40:00 pm")
        .with("mobile", "not-a-number");
    submitter.submit(payload).await.unwrap();

    let calls = transport.calls().await;
    let call = &calls[0];
    assert_eq!(call.field("feedback"), Some("More coffee at 2 AM please"));
    assert_eq!(call.field("source"), Some("night_canteen_app"));
    assert!(call.field("timestamp").is_some_and(|t| t.ends_with('Z')));
    assert!(call.field("sessionId").is_some_and(|s| s.starts_with("session_")));

    let successes = ledgers.successes.read_all();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].kind, SubmissionKind::Feedback);
}

#[tokio::test]
async fn success_ledger_keeps_the_ten_most_recent() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, ledgers) = harness(&transport, &[]);

    submitter
        .submit(Payload::new().with("feedback", "first"))
        .await
        .unwrap();
    for i in 0..10 {
        submitter.submit(order(&format!("Guest {i}"))).await.unwrap();
    }

    let successes = ledgers.successes.read_all();
    assert_eq!(successes.len(), 10);
    assert!(
        successes.iter().all(|r| r.kind == SubmissionKind::Order),
        "the oldest (feedback) record should have been evicted"
    );
}

#[tokio::test(start_paused = true)]
async fn sweep_drops_recovered_and_keeps_failed_records_unchanged() {
    // A is delivered on its first replay; B fails all three attempts.
    let transport = Arc::new(MockTransport::with_replies(vec![
        MockReply::ok_json(json!({"result": "success"})),
        MockReply::Network("down".into()),
        MockReply::Network("down".into()),
        MockReply::Network("down".into()),
    ]));
    let (submitter, ledgers) = harness(&transport, &[]);

    let record_a = queued("A");
    let record_b = queued("B");
    ledgers.failures.append_bounded(record_a);
    ledgers.failures.append_bounded(record_b.clone());

    let report = submitter.retry_failed().await;

    assert_eq!(
        report,
        SweepReport {
            replayed: 2,
            recovered: 1,
            skipped: 0,
            remaining: 1,
        }
    );
    assert_eq!(ledgers.failures.read_all(), vec![record_b]);
    assert_eq!(ledgers.successes.read_all().len(), 1);

    let calls = transport.calls().await;
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].field("name"), Some("A"));
    assert_eq!(calls[0].field("sessionId"), Some("session_1_A"), "replays are not re-enriched");
    assert!(calls[1..].iter().all(|c| c.field("name") == Some("B")));
}

#[tokio::test]
async fn sweep_keeps_records_without_payload() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, ledgers) = harness(&transport, &[]);

    let legacy = SubmissionRecord {
        timestamp: "2026-10-16T22:00:00.000Z".into(),
        kind: SubmissionKind::Order,
        success: false,
        data: None,
        attempts: Some(3),
    };
    ledgers.failures.append_bounded(legacy.clone());
    ledgers.failures.append_bounded(queued("C"));

    let report = submitter.retry_failed().await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.recovered, 1);
    assert_eq!(ledgers.failures.read_all(), vec![legacy]);
    assert_eq!(transport.call_count().await, 1);
}

#[tokio::test]
async fn sweep_on_empty_ledger_sends_nothing() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, _ledgers) = harness(&transport, &[]);

    assert_eq!(submitter.retry_failed().await, SweepReport::default());
    assert_eq!(transport.call_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn scheduled_sweep_waits_for_its_delay() {
    let transport = Arc::new(MockTransport::new());
    let (submitter, ledgers) = harness(&transport, &[]);
    ledgers.failures.append_bounded(queued("D"));

    let start = Instant::now();
    let report = submitter
        .spawn_retry_sweep(Duration::from_millis(2000))
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(report.recovered, 1);
    assert!(ledgers.failures.read_all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn concurrent_submissions_do_not_interleave() {
    let transport = Arc::new(MockTransport::with_replies(vec![MockReply::Network(
        "blip".into(),
    )]));
    let (submitter, _ledgers) = harness(&transport, &[]);

    let (first, second) = tokio::join!(
        submitter.submit(order("First")),
        submitter.submit(order("Second"))
    );
    first.unwrap();
    second.unwrap();

    let names: Vec<_> = transport
        .calls()
        .await
        .iter()
        .map(|c| c.field("name").unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["First", "First", "Second"]);
}

#[tokio::test(start_paused = true)]
async fn diagnostics_report_stats_and_retry() {
    let transport = Arc::new(MockTransport::with_replies(vec![
        MockReply::Timeout,
        MockReply::Timeout,
        MockReply::Timeout,
    ]));
    let (submitter, _ledgers) = harness(&transport, &[]);
    let diagnostics = Diagnostics::new(submitter.clone());

    submitter.submit(order("Asha")).await.unwrap_err();
    submitter.submit(order("Ravi")).await.unwrap();

    let stats = diagnostics.stats();
    assert_eq!((stats.successful, stats.failed, stats.total), (1, 1, 2));
    assert!((stats.success_rate - 0.5).abs() < f64::EPSILON);

    let report = diagnostics.retry_failed().await;
    assert_eq!(report.recovered, 1);
    assert_eq!(diagnostics.stats().failed, 0);
    assert_eq!(diagnostics.config().max_retries, 3);
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn retries_and_fallbacks_are_logged() {
    let transport = Arc::new(MockTransport::always(MockReply::Network("refused".into())));
    let (submitter, _ledgers) = harness(&transport, &[BACKUP_A]);

    submitter.submit(order("Asha")).await.unwrap_err();

    assert!(logs_contain("submission attempt failed"));
    assert!(logs_contain("trying fallback endpoint"));
    assert!(logs_contain("submission queued for retry"));
}

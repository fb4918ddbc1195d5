mod common;

use accessiscan::api::ApiClient;
use accessiscan::form::{
    opt_in, Field, FieldErrorKind, OptIn, ScanRequestForm, ScanSubmitter, SubmitOutcome,
};
use accessiscan::notify::{Level, MemoryNotifier};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use common::{spawn_backend, MockState};
use serde_json::json;
use std::sync::Arc;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

async fn submitter() -> (ScanSubmitter, Arc<MemoryNotifier>, MockState) {
    let (base, state) = spawn_backend().await;
    let client = Arc::new(ApiClient::new(&base, None).unwrap());
    let notifier = Arc::new(MemoryNotifier::new());
    let submitter = ScanSubmitter::new(client, notifier.clone());
    submitter.edit(|form| {
        form.website_url = "https://example.org".into();
        form.notification_email = "a@gmail.com".into();
    });
    (submitter, notifier, state)
}

#[tokio::test]
async fn test_immediate_scan_is_queued_and_form_resets() {
    let (submitter, notifier, state) = submitter().await;

    let outcome = submitter.submit_at(now()).await;

    assert!(outcome.is_submitted());
    let requests = state.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/run-once");
    assert_eq!(requests[0].body, json!({"email": "a@gmail.com", "url": "https://example.org"}));

    let note = notifier.last().unwrap();
    assert_eq!(note.level, Level::Success);
    assert_eq!(note.message, "Scan queued successfully! Job ID: J1");
    assert_eq!(submitter.form(), ScanRequestForm::default());
}

#[tokio::test]
async fn test_cron_schedule_payload() {
    let (submitter, notifier, state) = submitter().await;
    submitter.edit(|form| {
        form.schedule_type = "cron".into();
        form.minute = "0".into();
        form.hour = "9".into();
        form.day_of_week = "mon-fri".into();
        form.timezone = "UTC".into();
    });

    assert!(submitter.submit_at(now()).await.is_submitted());

    let request = &state.requests()[0];
    assert_eq!(request.path, "/schedule");
    assert_eq!(
        request.body,
        json!({
            "email": "a@gmail.com",
            "url": "https://example.org",
            "schedule": {
                "type": "cron",
                "timezone": "UTC",
                "cron": {"minute": "0", "hour": "9", "day_of_week": "mon-fri"}
            }
        })
    );
    assert_eq!(
        notifier.last().unwrap().message,
        "Scan scheduled successfully! Job ID: S1"
    );
}

#[tokio::test]
async fn test_interval_schedule_payload() {
    let (submitter, _notifier, state) = submitter().await;
    submitter.edit(|form| {
        form.schedule_type = "interval".into();
        form.interval_value = "2".into();
        form.interval_unit = "hours".into();
    });

    assert!(submitter.submit_at(now()).await.is_submitted());

    let schedule = &state.requests()[0].body["schedule"];
    assert_eq!(schedule["type"], "interval");
    assert_eq!(schedule["interval"], json!({"hours": 2}));
    assert!(schedule.get("cron").is_none());
}

#[tokio::test]
async fn test_date_schedule_payload() {
    let (submitter, _notifier, state) = submitter().await;
    submitter.edit(|form| {
        form.schedule_type = "date".into();
        form.timezone = "Asia/Tokyo".into();
        form.scheduled_date_time = "2026-10-20T08:30".into();
    });

    assert!(submitter.submit_at(now()).await.is_submitted());

    let schedule = &state.requests()[0].body["schedule"];
    assert_eq!(
        schedule,
        &json!({"type": "date", "timezone": "Asia/Tokyo", "run_at": "2026-10-20T08:30:00"})
    );
}

#[tokio::test]
async fn test_past_date_is_rejected_without_network_call() {
    let (submitter, notifier, state) = submitter().await;
    let past = (now() - Duration::minutes(1)).format("%Y-%m-%dT%H:%M").to_string();
    submitter.edit(|form| {
        form.schedule_type = "date".into();
        form.scheduled_date_time = past;
    });

    match submitter.submit_at(now()).await {
        SubmitOutcome::Rejected(errors) => {
            assert!(errors.has(Field::ScheduledDateTime, FieldErrorKind::PastDateTime));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(state.requests().is_empty());
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_notified_and_form_kept() {
    let (submitter, notifier, state) = submitter().await;
    submitter.edit(|form| form.website_url = "https://ratelimit.example.org".into());
    let before = submitter.form();

    let outcome = submitter.submit_at(now()).await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed { ref message, classification }
            if message == "rate limited" && classification.exit_code == 5
    ));
    assert_eq!(state.count("/run-once"), 1);
    let note = notifier.last().unwrap();
    assert_eq!(note.level, Level::Error);
    assert!(note.message.contains("rate limited"));
    assert_eq!(submitter.form(), before);
}

#[tokio::test]
async fn test_opt_in_after_submission() {
    let (base, state) = spawn_backend().await;
    let client = ApiClient::new(&base, None).unwrap();
    let notifier = MemoryNotifier::new();

    let stored = opt_in(&client, &notifier, "a@gmail.com", Some("Ada")).await;
    assert_eq!(stored, OptIn::Stored { id: "e1".into() });

    let duplicate = opt_in(&client, &notifier, "dup@gmail.com", None).await;
    assert_eq!(duplicate, OptIn::AlreadySubscribed);
    assert_eq!(notifier.last().unwrap().level, Level::Info);
    assert_eq!(state.count("/emails"), 2);
}

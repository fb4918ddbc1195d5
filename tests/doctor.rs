mod common;

use accessiscan::api::ApiClient;
use accessiscan::cli::doctor::{backend_checks, run_checks};
use common::{dead_backend, spawn_backend};

#[tokio::test]
async fn test_checks_pass_against_healthy_backend() {
    let (base, state) = spawn_backend().await;
    let client = ApiClient::new(&base, None).unwrap();

    let results = run_checks(backend_checks(&client, None)).await;

    let names: Vec<_> = results.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["Health check", "List jobs"]);
    assert!(results.iter().all(|r| r.outcome.is_ok()));
    assert_eq!(results[1].outcome.as_ref().unwrap()["jobs"], 2);
    assert_eq!(state.count("/run-once"), 0);
}

#[tokio::test]
async fn test_test_scan_only_when_requested() {
    let (base, state) = spawn_backend().await;
    let client = ApiClient::new(&base, None).unwrap();

    let results = run_checks(backend_checks(
        &client,
        Some(("test@gmail.com", "https://example.com")),
    ))
    .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[2].outcome.as_ref().unwrap()["job_id"], "J1");
    assert_eq!(state.count("/run-once"), 1);
}

#[tokio::test]
async fn test_every_check_runs_when_backend_is_down() {
    let client = ApiClient::new(&dead_backend().await, None).unwrap();

    let results = run_checks(backend_checks(&client, None)).await;

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_eq!(
            result.outcome.as_ref().unwrap_err(),
            "Network error - check if the API server is running"
        );
    }
}

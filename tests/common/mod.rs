#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A request the mock backend received: method, path and JSON body.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

/// How `GET /jobs` answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobsReply {
    #[default]
    Listed,
    ServerError,
    /// 200 with a body that is not a job list.
    Garbled,
}

#[derive(Clone, Default)]
pub struct MockState {
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    jobs_reply: Arc<Mutex<JobsReply>>,
    delay: Arc<Mutex<Duration>>,
}

impl MockState {
    fn record(&self, method: &'static str, path: String, body: Value) {
        self.requests.lock().unwrap().push(Recorded { method, path, body });
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_jobs_reply(&self, reply: JobsReply) {
        *self.jobs_reply.lock().unwrap() = reply;
    }

    /// Delay applied before answering `/health` and `/jobs`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    async fn wait(&self) {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

type Reply = (StatusCode, Json<Value>);

async fn health(State(state): State<MockState>) -> Json<Value> {
    state.record("GET", "/health".into(), Value::Null);
    state.wait().await;
    Json(json!({"status": "healthy"}))
}

async fn run_once(State(state): State<MockState>, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/run-once".into(), body.clone());
    if body["url"].as_str().is_some_and(|u| u.contains("ratelimit")) {
        return (StatusCode::TOO_MANY_REQUESTS, Json(json!({"error": "rate limited"})));
    }
    (StatusCode::OK, Json(json!({"job_id": "J1", "message": "Scan queued"})))
}

async fn schedule(State(state): State<MockState>, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/schedule".into(), body);
    (StatusCode::OK, Json(json!({"job_id": "S1", "message": "Scan scheduled"})))
}

async fn list_jobs(State(state): State<MockState>) -> Reply {
    state.record("GET", "/jobs".into(), Value::Null);
    state.wait().await;
    let reply = *state.jobs_reply.lock().unwrap();
    match reply {
        JobsReply::Listed => {}
        JobsReply::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
        }
        JobsReply::Garbled => return (StatusCode::OK, Json(json!({"jobs": "unavailable"}))),
    }
    (StatusCode::OK, Json(json!({
        "jobs": [
            {
                "id": "S1",
                "email": "a@gmail.com",
                "url": "https://example.org",
                "schedule": {"type": "cron", "cron": {"minute": "0", "hour": "9", "day_of_week": "mon-fri"}},
                "next_run_time": "2030-01-01T09:00:00+00:00",
                "created_at": "2026-10-19T08:00:00"
            },
            {
                "id": "S2",
                "email": "b@gmail.com",
                "url": "https://example.net",
                "schedule": {"type": "interval", "interval": {"hours": 2}},
                "next_run_time": null,
                "created_at": "2026-10-19T08:05:00"
            }
        ]
    })))
}

async fn delete_job(State(state): State<MockState>, Path(id): Path<String>) -> Reply {
    state.record("DELETE", format!("/jobs/{}", id), Value::Null);
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Job not found"})));
    }
    (StatusCode::OK, Json(json!({"message": format!("Job {} removed", id)})))
}

async fn store_email(State(state): State<MockState>, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/emails".into(), body.clone());
    if body["email"] == "dup@gmail.com" {
        return (StatusCode::CONFLICT, Json(json!({"error": "EMAIL_ALREADY_EXISTS"})));
    }
    (StatusCode::CREATED, Json(json!({"id": "e1", "message": "Email stored"})))
}

async fn list_emails(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record("GET", "/emails".into(), json!(query));
    Json(json!({
        "emails": [
            {"id": "e1", "email": "a@gmail.com", "name": "Ada", "active": true,
             "created_at": "2026-10-19T08:00:00", "updated_at": "2026-10-19T08:00:00"}
        ]
    }))
}

async fn update_email(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.record("PUT", format!("/emails/{}", id), body);
    Json(json!({"message": "Email updated"}))
}

async fn delete_email(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    state.record("DELETE", format!("/emails/{}", id), Value::Null);
    Json(json!({"message": "Email deactivated"}))
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/run-once", post(run_once))
        .route("/schedule", post(schedule))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:id", delete(delete_job))
        .route("/emails", post(store_email).get(list_emails))
        .route("/emails/:id", put(update_email).delete(delete_email))
        .with_state(state)
}

/// Serve the mock backend on an ephemeral port.
pub async fn spawn_backend() -> (String, MockState) {
    let state = MockState::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), state)
}

/// A base URL nothing is listening on.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

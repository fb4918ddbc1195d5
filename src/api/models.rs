use serde::{Deserialize, Serialize};

use crate::form::ScheduleSpec;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOnceRequest<'a> {
    pub email: &'a str,
    pub url: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest<'a> {
    pub email: &'a str,
    pub url: &'a str,
    pub schedule: &'a ScheduleSpec,
}

/// Reply to run-once and schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JobAccepted {
    pub job_id: String,
    #[serde(default)]
    pub message: String,
}

/// A job as listed by the backend. `schedule` is kept as raw JSON since
/// its shape depends on the trigger type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Job {
    pub id: String,
    pub email: String,
    pub url: String,
    #[serde(default)]
    pub schedule: serde_json::Value,
    #[serde(default)]
    pub next_run_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Job {
    /// Short human description of the job's trigger.
    pub fn schedule_summary(&self) -> String {
        let schedule = &self.schedule;
        match schedule.get("type").and_then(|t| t.as_str()) {
            Some("cron") => {
                let cron = &schedule["cron"];
                format!(
                    "cron {} {} {}",
                    cron["minute"].as_str().unwrap_or("*"),
                    cron["hour"].as_str().unwrap_or("*"),
                    cron["day_of_week"].as_str().unwrap_or("*"),
                )
            }
            Some("interval") => match schedule["interval"].as_object() {
                Some(units) => {
                    let parts: Vec<String> = units
                        .iter()
                        .filter_map(|(unit, n)| n.as_u64().map(|n| format!("{} {}", n, unit)))
                        .collect();
                    format!("every {}", parts.join(" "))
                }
                None => "interval".to_string(),
            },
            Some("date") => format!("once at {}", schedule["run_at"].as_str().unwrap_or("?")),
            Some(other) => other.to_string(),
            None if schedule.is_string() => schedule.as_str().unwrap_or_default().to_string(),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreEmailRequest<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredEmail {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmailRecord {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailList {
    #[serde(default)]
    pub emails: Vec<EmailRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEmailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateEmailRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

use async_trait::async_trait;

use crate::errors::AccessiscanError;
use crate::form::ScheduleSpec;
use super::models::{HealthStatus, Job, JobAccepted, MessageResponse, StoredEmail};

/// The scanning backend as seen by the form, the health poller and the CLI.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Readiness probe
    async fn health(&self) -> Result<HealthStatus, AccessiscanError>;

    /// Queue a scan to run right away
    async fn run_once(&self, email: &str, url: &str) -> Result<JobAccepted, AccessiscanError>;

    /// Register a recurring or future scan
    async fn schedule(
        &self,
        email: &str,
        url: &str,
        schedule: &ScheduleSpec,
    ) -> Result<JobAccepted, AccessiscanError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, AccessiscanError>;

    async fn delete_job(&self, job_id: &str) -> Result<MessageResponse, AccessiscanError>;

    /// Opt an address into product emails
    async fn store_email(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<StoredEmail, AccessiscanError>;

    /// Look a job up by id. The backend has no single-job endpoint, so this
    /// scans the job list.
    async fn find_job(&self, job_id: &str) -> Result<Job, AccessiscanError> {
        self.list_jobs()
            .await?
            .into_iter()
            .find(|job| job.id == job_id)
            .ok_or_else(|| AccessiscanError::NotFound("Scan request not found".into()))
    }

    /// Run an existing job's target once, outside its schedule.
    async fn trigger_job(&self, job_id: &str) -> Result<JobAccepted, AccessiscanError> {
        let job = self.find_job(job_id).await?;
        self.run_once(&job.email, &job.url).await
    }

    /// Base URL for display
    fn endpoint(&self) -> &str;
}

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::errors::{AccessiscanError, NETWORK_ERROR_MESSAGE};
use crate::form::ScheduleSpec;
use super::backend::ScanBackend;
use super::errors::interpret_error;
use super::models::{
    EmailList, EmailRecord, HealthStatus, Job, JobAccepted, JobList, MessageResponse,
    RunOnceRequest, ScheduleRequest, StoreEmailRequest, StoredEmail, UpdateEmailRequest,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// HTTP client for the scanning backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    display_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AccessiscanError> {
        let parsed = Url::parse(base_url)?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(AccessiscanError::Config(format!(
                "API URL must be an http(s) URL: {}",
                base_url
            )));
        }

        // The timeout is applied per request so health pings can go without one.
        let client = Client::builder()
            .user_agent(user_agent())
            .build()
            .map_err(|e| AccessiscanError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            display_url: base_url.trim_end_matches('/').to_string(),
            base_url: parsed,
            timeout,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn url(&self, segments: &[&str]) -> Result<Url, AccessiscanError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AccessiscanError::Config(format!("Unusable API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send with the configured timeout.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, AccessiscanError> {
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };
        self.send(request, url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<T, AccessiscanError> {
        let resp = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Backend request failed");
            AccessiscanError::Network(NETWORK_ERROR_MESSAGE.into())
        })?;

        let status = resp.status();
        debug!(url = %url, status = status.as_u16(), "Backend responded");

        if status.is_success() {
            // The server answered, so an undecodable body is an API fault.
            return resp.json::<T>().await.map_err(|e| AccessiscanError::Api {
                status: status.as_u16(),
                message: format!("Invalid response from {}: {}", url, e),
            });
        }

        let body: Option<Value> = resp.json().await.ok();
        Err(interpret_error(status.as_u16(), url.as_str(), body.as_ref()))
    }

    /// All stored marketing addresses, or only active ones.
    pub async fn list_emails(&self, active_only: bool) -> Result<Vec<EmailRecord>, AccessiscanError> {
        let url = self.url(&["emails"])?;
        let mut request = self.client.get(url.clone());
        if active_only {
            request = request.query(&[("active", "true")]);
        }
        let list: EmailList = self.execute(request, &url).await?;
        Ok(list.emails)
    }

    pub async fn update_email(
        &self,
        id: &str,
        update: &UpdateEmailRequest,
    ) -> Result<MessageResponse, AccessiscanError> {
        let url = self.url(&["emails", id])?;
        self.execute(self.client.put(url.clone()).json(update), &url).await
    }

    /// Soft delete; the backend only marks the address inactive.
    pub async fn delete_email(&self, id: &str) -> Result<MessageResponse, AccessiscanError> {
        let url = self.url(&["emails", id])?;
        self.execute(self.client.delete(url.clone()), &url).await
    }
}

#[async_trait]
impl ScanBackend for ApiClient {
    /// Never timed out; a sleeping backend may take a while to answer.
    async fn health(&self) -> Result<HealthStatus, AccessiscanError> {
        let url = self.url(&["health"])?;
        self.send(self.client.get(url.clone()), &url).await
    }

    async fn run_once(&self, email: &str, url: &str) -> Result<JobAccepted, AccessiscanError> {
        let endpoint = self.url(&["run-once"])?;
        let body = RunOnceRequest { email, url };
        self.execute(self.client.post(endpoint.clone()).json(&body), &endpoint).await
    }

    async fn schedule(
        &self,
        email: &str,
        url: &str,
        schedule: &ScheduleSpec,
    ) -> Result<JobAccepted, AccessiscanError> {
        let endpoint = self.url(&["schedule"])?;
        let body = ScheduleRequest { email, url, schedule };
        self.execute(self.client.post(endpoint.clone()).json(&body), &endpoint).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AccessiscanError> {
        let url = self.url(&["jobs"])?;
        let list: JobList = self.execute(self.client.get(url.clone()), &url).await?;
        Ok(list.jobs)
    }

    async fn delete_job(&self, job_id: &str) -> Result<MessageResponse, AccessiscanError> {
        let url = self.url(&["jobs", job_id])?;
        self.execute(self.client.delete(url.clone()), &url).await
    }

    async fn store_email(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<StoredEmail, AccessiscanError> {
        let url = self.url(&["emails"])?;
        let body = StoreEmailRequest {
            email,
            name: name.unwrap_or_default(),
            active: true,
        };
        self.execute(self.client.post(url.clone()).json(&body), &url).await
    }

    fn endpoint(&self) -> &str {
        &self.display_url
    }
}

/// `accessiscan/<version>` plus the commit when the build recorded one.
pub fn user_agent() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) => format!("accessiscan/{} ({})", env!("CARGO_PKG_VERSION"), hash),
        None => format!("accessiscan/{}", env!("CARGO_PKG_VERSION")),
    }
}

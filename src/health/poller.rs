use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::ScanBackend;
use crate::notify::Notifier;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 40;

const WAKING_MESSAGE: &str = "Waking up the server! The scanning service sleeps when idle, so booting it may take a minute or so.";
const ONLINE_MESSAGE: &str = "Server is now online and ready!";
const GAVE_UP_MESSAGE: &str = "Server is taking longer than expected. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Healthy { attempts: u32 },
    GaveUp { attempts: u32 },
    Cancelled { attempts: u32 },
}

/// Pings the health endpoint until it answers, a bounded number of times.
///
/// One ping is made straight away. If it fails, the poller waits `interval`
/// between further pings, up to `max_attempts` of them. Each ping is an
/// independent request with no timeout of its own; cancelling the token
/// stops the poller at once, including mid-request.
#[derive(Debug, Clone, Copy)]
pub struct HealthPoller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for HealthPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

impl HealthPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self { interval, max_attempts }
    }

    pub async fn wait_until_healthy(
        &self,
        backend: &dyn ScanBackend,
        notifier: &dyn Notifier,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let mut attempts = 0;
        match ping(backend, cancel).await {
            Some(true) => return PollOutcome::Healthy { attempts: 1 },
            Some(false) => {
                attempts = 1;
                notifier.info(WAKING_MESSAGE);
            }
            None => return PollOutcome::Cancelled { attempts },
        }

        for retry in 1..=self.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempts, "Health polling cancelled");
                    return PollOutcome::Cancelled { attempts };
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            match ping(backend, cancel).await {
                Some(true) => {
                    attempts += 1;
                    info!(attempts, "Backend is healthy");
                    notifier.success(ONLINE_MESSAGE);
                    return PollOutcome::Healthy { attempts };
                }
                Some(false) => {
                    attempts += 1;
                    debug!(retry, max = self.max_attempts, "Backend not ready yet");
                }
                None => return PollOutcome::Cancelled { attempts },
            }
        }

        warn!(attempts, "Backend did not become healthy");
        notifier.error(GAVE_UP_MESSAGE);
        PollOutcome::GaveUp { attempts }
    }
}

/// `None` if cancelled before the backend answered.
async fn ping(backend: &dyn ScanBackend, cancel: &CancellationToken) -> Option<bool> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = backend.health() => Some(match result {
            Ok(status) => {
                debug!(status = %status.status, "Health check answered");
                true
            }
            Err(e) => {
                debug!(error = %e, "Health check failed");
                false
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{HealthStatus, Job, JobAccepted, MessageResponse, StoredEmail};
    use crate::errors::AccessiscanError;
    use crate::form::ScheduleSpec;
    use crate::notify::{Level, MemoryNotifier};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` health checks.
    struct FlakyBackend {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyBackend {
        fn new(failures: u32) -> Self {
            Self { failures, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl ScanBackend for FlakyBackend {
        async fn health(&self) -> Result<HealthStatus, AccessiscanError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(AccessiscanError::Network("down".into()))
            } else {
                Ok(HealthStatus { status: "healthy".into() })
            }
        }

        async fn run_once(&self, _email: &str, _url: &str) -> Result<JobAccepted, AccessiscanError> {
            unreachable!()
        }

        async fn schedule(&self, _email: &str, _url: &str, _spec: &ScheduleSpec) -> Result<JobAccepted, AccessiscanError> {
            unreachable!()
        }

        async fn list_jobs(&self) -> Result<Vec<Job>, AccessiscanError> {
            unreachable!()
        }

        async fn delete_job(&self, _job_id: &str) -> Result<MessageResponse, AccessiscanError> {
            unreachable!()
        }

        async fn store_email(&self, _email: &str, _name: Option<&str>) -> Result<StoredEmail, AccessiscanError> {
            unreachable!()
        }

        fn endpoint(&self) -> &str {
            "fake://flaky"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_on_first_ping() {
        let backend = FlakyBackend::new(0);
        let notifier = MemoryNotifier::new();
        let outcome = HealthPoller::default()
            .wait_until_healthy(&backend, &notifier, &CancellationToken::new())
            .await;
        assert_eq!(outcome, PollOutcome::Healthy { attempts: 1 });
        assert!(notifier.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_failures() {
        let backend = FlakyBackend::new(3);
        let notifier = MemoryNotifier::new();
        let outcome = HealthPoller::default()
            .wait_until_healthy(&backend, &notifier, &CancellationToken::new())
            .await;
        assert_eq!(outcome, PollOutcome::Healthy { attempts: 4 });
        let notes = notifier.notifications();
        assert_eq!(notes.first().unwrap().level, Level::Info);
        assert_eq!(notes.last().unwrap().message, ONLINE_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let backend = FlakyBackend::new(u32::MAX);
        let notifier = MemoryNotifier::new();
        let outcome = HealthPoller::new(Duration::from_secs(3), 5)
            .wait_until_healthy(&backend, &notifier, &CancellationToken::new())
            .await;
        assert_eq!(outcome, PollOutcome::GaveUp { attempts: 6 });
        assert_eq!(backend.calls.load(Ordering::SeqCst), 6);
        assert_eq!(notifier.last().unwrap().level, Level::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let backend = FlakyBackend::new(u32::MAX);
        let notifier = MemoryNotifier::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            trigger.cancel();
        });

        let outcome = HealthPoller::default()
            .wait_until_healthy(&backend, &notifier, &cancel)
            .await;
        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 3 });
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_never_pings() {
        let backend = FlakyBackend::new(0);
        let notifier = MemoryNotifier::new();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = HealthPoller::default()
            .wait_until_healthy(&backend, &notifier, &cancel)
            .await;
        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 0 });
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}

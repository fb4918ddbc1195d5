use tracing::warn;

use crate::api::ScanBackend;
use crate::errors::AccessiscanError;
use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptIn {
    Stored { id: String },
    AlreadySubscribed,
    Failed { message: String },
}

/// Store `email` for product updates after a scan request went through.
/// Never fails the caller: a duplicate address is informational and any
/// other error is only logged.
pub async fn opt_in(
    backend: &dyn ScanBackend,
    notifier: &dyn Notifier,
    email: &str,
    name: Option<&str>,
) -> OptIn {
    match backend.store_email(email, name).await {
        Ok(stored) => {
            notifier.info(&format!("Subscribed {} to product updates", email));
            OptIn::Stored { id: stored.id }
        }
        Err(AccessiscanError::EmailAlreadyExists) => {
            notifier.info(&format!("{} is already subscribed", email));
            OptIn::AlreadySubscribed
        }
        Err(e) => {
            warn!(error = %e, "Failed to store email for product updates");
            OptIn::Failed { message: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{HealthStatus, Job, JobAccepted, MessageResponse, StoredEmail};
    use crate::form::ScheduleSpec;
    use crate::notify::{Level, MemoryNotifier};
    use async_trait::async_trait;

    struct EmailBackend {
        reply: fn() -> Result<StoredEmail, AccessiscanError>,
    }

    #[async_trait]
    impl ScanBackend for EmailBackend {
        async fn health(&self) -> Result<HealthStatus, AccessiscanError> {
            unreachable!()
        }

        async fn run_once(&self, _email: &str, _url: &str) -> Result<JobAccepted, AccessiscanError> {
            unreachable!()
        }

        async fn schedule(
            &self,
            _email: &str,
            _url: &str,
            _spec: &ScheduleSpec,
        ) -> Result<JobAccepted, AccessiscanError> {
            unreachable!()
        }

        async fn list_jobs(&self) -> Result<Vec<Job>, AccessiscanError> {
            unreachable!()
        }

        async fn delete_job(&self, _job_id: &str) -> Result<MessageResponse, AccessiscanError> {
            unreachable!()
        }

        async fn store_email(
            &self,
            _email: &str,
            _name: Option<&str>,
        ) -> Result<StoredEmail, AccessiscanError> {
            (self.reply)()
        }

        fn endpoint(&self) -> &str {
            "fake://emails"
        }
    }

    #[tokio::test]
    async fn test_stored() {
        let backend = EmailBackend {
            reply: || Ok(StoredEmail { id: "e1".into(), message: "ok".into() }),
        };
        let notifier = MemoryNotifier::new();
        let result = opt_in(&backend, &notifier, "a@gmail.com", Some("Ada")).await;
        assert_eq!(result, OptIn::Stored { id: "e1".into() });
        assert_eq!(notifier.last().unwrap().level, Level::Info);
    }

    #[tokio::test]
    async fn test_duplicate_is_informational() {
        let backend = EmailBackend { reply: || Err(AccessiscanError::EmailAlreadyExists) };
        let notifier = MemoryNotifier::new();
        let result = opt_in(&backend, &notifier, "a@gmail.com", None).await;
        assert_eq!(result, OptIn::AlreadySubscribed);
        assert!(notifier.last().unwrap().message.contains("already subscribed"));
    }

    #[tokio::test]
    async fn test_other_failures_stay_silent() {
        let backend = EmailBackend {
            reply: || Err(AccessiscanError::Network("down".into())),
        };
        let notifier = MemoryNotifier::new();
        let result = opt_in(&backend, &notifier, "a@gmail.com", None).await;
        assert!(matches!(result, OptIn::Failed { .. }));
        assert!(notifier.is_empty());
    }
}

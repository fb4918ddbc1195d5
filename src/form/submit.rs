use chrono::NaiveDateTime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::api::ScanBackend;
use crate::errors::ErrorClassification;
use crate::notify::Notifier;
use super::fields::ScanRequestForm;
use super::schedule::Schedule;
use super::validation::{ScanRequest, ValidationErrors};

/// Shown when a failure carries no message of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred while creating the scan";

/// Where the user goes after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Scans,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationErrors),
    Submitted {
        job_id: String,
        message: String,
        schedule: Schedule,
        route: Route,
    },
    /// The backend call failed; the form keeps what was entered.
    Failed {
        message: String,
        classification: ErrorClassification,
    },
    /// Another submission from this form is still in flight.
    Busy,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns a scan request form and submits it to the backend, at most one
/// request at a time.
pub struct ScanSubmitter {
    backend: Arc<dyn ScanBackend>,
    notifier: Arc<dyn Notifier>,
    form: Mutex<ScanRequestForm>,
    defaults: ScanRequestForm,
    in_flight: AtomicBool,
}

impl ScanSubmitter {
    pub fn new(backend: Arc<dyn ScanBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_defaults(backend, notifier, ScanRequestForm::default())
    }

    /// `defaults` is both the initial state and what a successful
    /// submission resets to.
    pub fn with_defaults(
        backend: Arc<dyn ScanBackend>,
        notifier: Arc<dyn Notifier>,
        defaults: ScanRequestForm,
    ) -> Self {
        Self {
            backend,
            notifier,
            form: Mutex::new(defaults.clone()),
            defaults,
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock_form(&self) -> MutexGuard<'_, ScanRequestForm> {
        self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current inputs.
    pub fn form(&self) -> ScanRequestForm {
        self.lock_form().clone()
    }

    pub fn edit(&self, apply: impl FnOnce(&mut ScanRequestForm)) {
        apply(&mut self.lock_form());
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_at(chrono::Local::now().naive_local()).await
    }

    /// Validate against `now` and, if valid, make exactly one backend call.
    pub async fn submit_at(&self, now: NaiveDateTime) -> SubmitOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Submission ignored, another one is in flight");
            return SubmitOutcome::Busy;
        };

        let snapshot = self.form();
        let request = match snapshot.validate(now) {
            Ok(request) => request,
            Err(errors) => {
                warn!(errors = errors.len(), "Scan request failed validation");
                return SubmitOutcome::Rejected(errors);
            }
        };

        let ScanRequest { email, url, schedule } = request;
        let result = match schedule.spec() {
            None => {
                info!(url = %url, "Requesting immediate scan");
                self.backend.run_once(&email, &url).await
            }
            Some(spec) => {
                info!(url = %url, schedule = %schedule, "Scheduling scan");
                self.backend.schedule(&email, &url, &spec).await
            }
        };

        match result {
            Ok(accepted) => {
                let verb = if schedule.is_immediate() { "queued" } else { "scheduled" };
                self.notifier.success(&format!(
                    "Scan {} successfully! Job ID: {}",
                    verb, accepted.job_id
                ));
                *self.lock_form() = self.defaults.clone();
                info!(job_id = %accepted.job_id, "Scan request accepted");
                SubmitOutcome::Submitted {
                    job_id: accepted.job_id,
                    message: accepted.message,
                    schedule,
                    route: Route::Scans,
                }
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = GENERIC_FAILURE_MESSAGE.to_string();
                }
                warn!(error = %message, "Scan request failed");
                self.notifier.error(&message);
                SubmitOutcome::Failed {
                    message,
                    classification: e.classify(),
                }
            }
        }
    }
}

//! Client side of the scanning backend's REST API.

pub mod backend;
pub mod client;
pub mod errors;
pub mod models;

pub use backend::ScanBackend;
pub use client::{ApiClient, DEFAULT_API_URL};
pub use models::{EmailRecord, HealthStatus, Job, JobAccepted, MessageResponse, StoredEmail, UpdateEmailRequest};

use thiserror::Error;

use crate::form::ValidationErrors;

/// Message shown when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - check if the API server is running";

#[derive(Debug, Error)]
pub enum AccessiscanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Network(String),

    /// Structured error reported by the backend (the `error` field of its body).
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Email address is already subscribed")]
    EmailAlreadyExists,

    #[error("A submission is already in progress")]
    Busy,

    #[error("Server did not become healthy after {attempts} attempts")]
    HealthTimeout { attempts: u32 },

    #[error("Cancelled")]
    Cancelled,

    /// Failure already shown to the user; carries what the process exit needs.
    #[error("{message}")]
    Reported { message: String, exit_code: i32 },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for AccessiscanError {
    fn from(errors: ValidationErrors) -> Self {
        AccessiscanError::Validation(errors)
    }
}

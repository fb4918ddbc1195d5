use super::types::AccessiscanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub exit_code: i32,
}

impl AccessiscanError {
    /// Classify this error for logging and for the process exit code.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            AccessiscanError::Config(_)
            | AccessiscanError::Url(_)
            | AccessiscanError::Yaml(_) => ErrorClassification {
                error_type: "ConfigError",
                exit_code: 2,
            },
            AccessiscanError::Validation(_) => ErrorClassification {
                error_type: "ValidationError",
                exit_code: 3,
            },
            AccessiscanError::Network(_) | AccessiscanError::HealthTimeout { .. } => {
                ErrorClassification {
                    error_type: "NetworkError",
                    exit_code: 4,
                }
            }
            AccessiscanError::Api { .. }
            | AccessiscanError::NotFound(_)
            | AccessiscanError::EmailAlreadyExists => ErrorClassification {
                error_type: "ApiError",
                exit_code: 5,
            },
            AccessiscanError::Reported { exit_code, .. } => ErrorClassification {
                error_type: "Reported",
                exit_code: *exit_code,
            },
            AccessiscanError::Busy => ErrorClassification {
                error_type: "BusyError",
                exit_code: 1,
            },
            AccessiscanError::Cancelled => ErrorClassification {
                error_type: "Cancelled",
                exit_code: 130,
            },
            AccessiscanError::Io(_)
            | AccessiscanError::Json(_)
            | AccessiscanError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                exit_code: 1,
            },
        }
    }
}

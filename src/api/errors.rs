use serde_json::Value;

use crate::errors::AccessiscanError;

/// Error string the backend uses when an email is already stored.
pub const EMAIL_ALREADY_EXISTS: &str = "EMAIL_ALREADY_EXISTS";

/// Turn a non-success backend reply into a crate error. A structured
/// `error` message in the body takes precedence over the status code.
pub fn interpret_error(status: u16, url: &str, body: Option<&Value>) -> AccessiscanError {
    if let Some(message) = body.and_then(|b| b.get("error")).and_then(|e| e.as_str()) {
        if message == EMAIL_ALREADY_EXISTS {
            return AccessiscanError::EmailAlreadyExists;
        }
        return AccessiscanError::Api {
            status,
            message: message.to_string(),
        };
    }

    if status == 404 {
        return AccessiscanError::NotFound(format!("API endpoint not found: {}", url));
    }

    AccessiscanError::Api {
        status,
        message: format!("Request failed with status {}", status),
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::DEFAULT_API_URL;
use crate::errors::AccessiscanError;
use crate::form::fields::DEFAULT_TIMEZONE;
use crate::health::poller::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL};

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "ACCESSISCAN_API_URL";

/// On-disk configuration. Every section is optional.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AccessiscanConfig {
    pub api: Option<ApiConfig>,
    pub defaults: Option<DefaultsConfig>,
    pub health: Option<HealthConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ApiConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values prefilled into a new scan request.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    pub timezone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HealthConfig {
    pub interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

/// Effective settings after merging flags, environment, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub timezone: String,
    pub default_email: Option<String>,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_email: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Precedence for the API URL: flag, then environment, then file.
    pub fn resolve(
        flag_api_url: Option<&str>,
        env_api_url: Option<&str>,
        file: Option<&AccessiscanConfig>,
    ) -> Result<Self, AccessiscanError> {
        let mut settings = Settings::default();

        if let Some(config) = file {
            if let Some(api) = &config.api {
                if let Some(url) = &api.url {
                    settings.api_url = url.clone();
                }
                settings.timeout = api.timeout_secs.map(Duration::from_secs);
            }
            if let Some(defaults) = &config.defaults {
                if let Some(tz) = defaults.timezone.as_ref().filter(|tz| !tz.trim().is_empty()) {
                    settings.timezone = tz.clone();
                }
                settings.default_email = defaults.email.clone().filter(|e| !e.trim().is_empty());
            }
            if let Some(health) = &config.health {
                if let Some(secs) = health.interval_secs {
                    settings.poll_interval = Duration::from_secs(secs);
                }
                if let Some(max) = health.max_attempts {
                    settings.max_attempts = max;
                }
            }
        }

        if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
            settings.api_url = url.to_string();
        }
        if let Some(url) = flag_api_url {
            settings.api_url = url.to_string();
        }

        if settings.poll_interval.is_zero() {
            return Err(AccessiscanError::Config("health.interval_secs must be at least 1".into()));
        }
        if settings.max_attempts == 0 {
            return Err(AccessiscanError::Config("health.max_attempts must be at least 1".into()));
        }

        Ok(settings)
    }
}

use std::path::Path;
use tracing::warn;
use url::Url;

use crate::errors::AccessiscanError;
use crate::form::validation::check_email;
use crate::form::{Field, FieldError};
use super::schema::CONFIG_SCHEMA;
use super::types::AccessiscanConfig;

pub async fn parse_config(path: &Path) -> Result<AccessiscanConfig, AccessiscanError> {
    if !path.exists() {
        return Err(AccessiscanError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(AccessiscanError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<AccessiscanConfig, AccessiscanError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(AccessiscanConfig::default());
    }

    // JSON Schema validation
    validate_schema(&yaml)?;

    let config: AccessiscanConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema. Violations are reported as
/// warnings; the typed parse that follows is what rejects a file.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), AccessiscanError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| AccessiscanError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| AccessiscanError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| AccessiscanError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Checks the schema cannot express.
fn validate_semantics(config: &AccessiscanConfig) -> Result<(), AccessiscanError> {
    if let Some(url) = config.api.as_ref().and_then(|api| api.url.as_deref()) {
        let parsed = Url::parse(url)
            .map_err(|e| AccessiscanError::Config(format!("Invalid api.url '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AccessiscanError::Config(format!(
                "api.url must use http or https: {}",
                url
            )));
        }
    }

    if let Some(email) = config.defaults.as_ref().and_then(|d| d.email.as_deref()) {
        if let Some(kind) = check_email(email) {
            return Err(AccessiscanError::Config(format!(
                "defaults.email '{}' is not usable: {}",
                email,
                FieldError::new(Field::NotificationEmail, kind).message()
            )));
        }
    }

    if let Some(health) = &config.health {
        if health.interval_secs == Some(0) || health.max_attempts == Some(0) {
            return Err(AccessiscanError::Config(
                "health.interval_secs and health.max_attempts must be at least 1".into(),
            ));
        }
    }

    Ok(())
}

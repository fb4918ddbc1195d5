use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "api": {
                "type": "object",
                "properties": {
                    "url": { "type": "string", "format": "uri" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            },
            "defaults": {
                "type": "object",
                "properties": {
                    "timezone": { "type": "string", "minLength": 1 },
                    "email": { "type": "string" }
                },
                "additionalProperties": false
            },
            "health": {
                "type": "object",
                "properties": {
                    "interval_secs": { "type": "integer", "minimum": 1 },
                    "max_attempts": { "type": "integer", "minimum": 1 }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
});

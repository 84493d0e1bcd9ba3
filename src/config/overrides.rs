//! Per-event configuration overrides read from Sensu annotations.
//!
//! An annotation `sensu.io/plugins/sensu-opsgenie-handler/config/<path>`
//! on the check, or failing that on the entity, replaces the option with
//! that path for the current event only. The auth token is not in the
//! list and can only come from flags or the environment.

use super::types::{HandlerConfig, KEYSPACE};
use crate::error::ConfigError;
use crate::event::Event;

/// Option paths that may be overridden, in application order.
const OVERRIDABLE: [&str; 14] = [
    "region",
    "team",
    "sensuDashboard",
    "messageTemplate",
    "messageLimit",
    "descriptionTemplate",
    "descriptionLimit",
    "includeEventInNote",
    "priority",
    "actions",
    "withAnnotations",
    "withLabels",
    "fullDetails",
    "tagTemplate",
];

impl HandlerConfig {
    /// Return a copy of this configuration with the event's annotation overrides applied.
    pub fn with_event_overrides(&self, event: &Event) -> Result<HandlerConfig, ConfigError> {
        let mut config = self.clone();

        for path in OVERRIDABLE {
            let key = format!("{}/{}", KEYSPACE, path);
            let value = event
                .check
                .metadata
                .annotations
                .get(&key)
                .or_else(|| event.entity.metadata.annotations.get(&key));

            if let Some(value) = value {
                tracing::debug!(option = %path, "Applying annotation override");
                config.set_option(path, &key, value)?;
            }
        }

        Ok(config)
    }

    fn set_option(&mut self, path: &str, key: &str, value: &str) -> Result<(), ConfigError> {
        match path {
            "region" => self.api_region = value.to_string(),
            "team" => self.team = value.to_string(),
            "sensuDashboard" => self.sensu_dashboard = value.to_string(),
            "messageTemplate" => self.message_template = value.to_string(),
            "messageLimit" => self.message_limit = parse_limit(key, value)?,
            "descriptionTemplate" => self.description_template = value.to_string(),
            "descriptionLimit" => self.description_limit = parse_limit(key, value)?,
            "includeEventInNote" => self.include_event_in_note = parse_bool(key, value)?,
            "priority" => self.priority = value.to_string(),
            "actions" => self.actions = parse_list(key, value)?,
            "withAnnotations" => self.with_annotations = parse_bool(key, value)?,
            "withLabels" => self.with_labels = parse_bool(key, value)?,
            "fullDetails" => self.full_details = parse_bool(key, value)?,
            "tagTemplate" => self.tag_templates = parse_list(key, value)?,
            _ => {}
        }
        Ok(())
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidOverride {
            key: key.to_string(),
            message: e.to_string(),
        })
}

/// Accepts `1`, `t`, `true` and friends in their usual casings.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(ConfigError::InvalidOverride {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", other),
        }),
    }
}

/// A JSON array of strings, or a comma-separated list.
fn parse_list(key: &str, value: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| ConfigError::InvalidOverride {
            key: key.to_string(),
            message: e.to_string(),
        });
    }

    Ok(trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

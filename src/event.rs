//! Sensu Go event model.
//!
//! Only the fields the handler reads are typed. Everything else the
//! backend sends is kept in the `extra` maps so the event can be written
//! back out unchanged in the alert note.

use crate::error::EventError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::Read;

/// Decode `null` as the type's default.
///
/// Sensu writes unset lists and maps as `null` rather than omitting them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Object metadata shared by entities and checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub annotations: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Host facts reported by an agent entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub platform_family: String,
    #[serde(default)]
    pub platform_version: String,
    #[serde(default)]
    pub arch: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The monitored resource that produced the check result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub entity_class: String,
    #[serde(default)]
    pub system: System,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscriptions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single check execution result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub output: String,
    /// Exit status of the check; `0` means OK.
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub ttl: i64,
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub occurrences: i64,
    #[serde(default)]
    pub occurrences_watermark: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscriptions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handlers: Vec<String>,
    #[serde(default)]
    pub proxy_entity_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A monitoring event: one check result attached to one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub entity: Entity,
    pub check: Check,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Decode and validate an event from a JSON reader (the handler's stdin).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, EventError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Self::from_json(&raw)
    }

    /// Decode and validate an event from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let event: Event = serde_json::from_str(raw)?;
        event.validate()?;
        Ok(event)
    }

    /// Entity and check names are required to correlate alerts.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.entity.metadata.name.is_empty() {
            return Err(EventError::MissingField("entity name"));
        }
        if self.check.metadata.name.is_empty() {
            return Err(EventError::MissingField("check name"));
        }
        Ok(())
    }

    /// True when the check reports OK and any open alert should be closed.
    pub fn is_resolved(&self) -> bool {
        self.check.status == 0
    }

    /// Alert alias: `<entity>/<check>`, stable across problem/resolution cycles.
    pub fn alias(&self) -> String {
        format!("{}/{}", self.entity.metadata.name, self.check.metadata.name)
    }

    /// Minimal event for tests, shaped like the Sensu fixtures.
    #[cfg(test)]
    pub(crate) fn fixture(entity_name: &str, check_name: &str) -> Self {
        Event {
            entity: Entity {
                metadata: ObjectMeta {
                    name: entity_name.to_string(),
                    namespace: "default".to_string(),
                    ..Default::default()
                },
                entity_class: "host".to_string(),
                subscriptions: vec!["linux".to_string()],
                ..Default::default()
            },
            check: Check {
                metadata: ObjectMeta {
                    name: check_name.to_string(),
                    namespace: "default".to_string(),
                    ..Default::default()
                },
                command: "command".to_string(),
                interval: 60,
                subscriptions: vec!["linux".to_string()],
                handlers: vec!["opsgenie".to_string()],
                ..Default::default()
            },
            timestamp: 1_700_000_000,
            ..Default::default()
        }
    }
}

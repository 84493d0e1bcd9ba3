//! Handler configuration value and its defaults.

use super::secret::SecretString;
use crate::opsgenie::{API_URL, API_URL_EU};

/// Plugin name, used as the annotation keyspace segment.
pub const PLUGIN_NAME: &str = "sensu-opsgenie-handler";

/// Annotation prefix for per-event configuration overrides.
///
/// Annotations whose key contains this prefix are never copied into alert details.
pub const KEYSPACE: &str = "sensu.io/plugins/sensu-opsgenie-handler/config";

pub const DEFAULT_REGION: &str = "us";
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{{ entity.name }}/{{ check.name }}";
pub const DEFAULT_MESSAGE_LIMIT: usize = 130;
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "{{ check.output }}";
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 15000;
pub const DEFAULT_PRIORITY: &str = "P3";

/// Default tag templates: entity name, check name, namespace and entity class.
pub fn default_tag_templates() -> Vec<String> {
    vec![
        "{{ entity.name }}".to_string(),
        "{{ check.name }}".to_string(),
        "{{ entity.namespace }}".to_string(),
        "{{ entity.entity_class }}".to_string(),
    ]
}

/// OpsGenie API region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiRegion {
    #[default]
    Us,
    Eu,
}

impl ApiRegion {
    /// Parse a region name case-insensitively; anything but `eu` is `us`.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("eu") {
            ApiRegion::Eu
        } else {
            ApiRegion::Us
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            ApiRegion::Us => API_URL,
            ApiRegion::Eu => API_URL_EU,
        }
    }
}

/// Configuration for a single handler run.
///
/// Built once from flags and environment (see [`crate::cli::Cli`]), then
/// optionally refined by event annotations, then passed by reference to
/// every stage. Never mutated while an event is being handled.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerConfig {
    /// Region name (`us` or `eu`).
    pub api_region: String,
    /// Explicit API base URL, takes precedence over the region when set.
    pub api_url: Option<String>,
    /// OpsGenie API key.
    pub auth_token: SecretString,
    /// Team notified through the escalation and schedule responders.
    pub team: String,
    /// Sensu dashboard base URL, e.g. `http://sensu.example.local/c/~/n`.
    pub sensu_dashboard: String,
    pub message_template: String,
    /// Maximum byte length of the alert message.
    pub message_limit: usize,
    pub description_template: String,
    /// Maximum byte length of the alert description.
    pub description_limit: usize,
    pub include_event_in_note: bool,
    pub priority: String,
    /// OpsGenie custom actions attached to created alerts.
    pub actions: Vec<String>,
    pub with_annotations: bool,
    pub with_labels: bool,
    pub full_details: bool,
    pub tag_templates: Vec<String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            api_region: DEFAULT_REGION.to_string(),
            api_url: None,
            auth_token: SecretString::default(),
            team: String::new(),
            sensu_dashboard: String::new(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            description_template: DEFAULT_DESCRIPTION_TEMPLATE.to_string(),
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            include_event_in_note: false,
            priority: DEFAULT_PRIORITY.to_string(),
            actions: Vec::new(),
            with_annotations: false,
            with_labels: false,
            full_details: false,
            tag_templates: default_tag_templates(),
        }
    }
}

impl HandlerConfig {
    /// Base URL of the OpsGenie API for this run.
    pub fn api_base_url(&self) -> &str {
        match self.api_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => ApiRegion::parse(&self.api_region).base_url(),
        }
    }
}

//! Event to alert field mapping.
//!
//! Derives every field of an OpsGenie alert from a Sensu event and the
//! handler configuration. Template failures never abort the run: they
//! degrade to an empty title, description or tag list.

use crate::config::{HandlerConfig, KEYSPACE};
use crate::event::Event;
use crate::template::TemplateEngine;
use std::collections::BTreeMap;

/// Header line of the note carrying the raw event.
pub const NOTE_HEADER: &str = "Event data update:\n\n";

/// Maps events to alert fields for one configuration.
#[derive(Debug)]
pub struct AlertMapper<'a> {
    config: &'a HandlerConfig,
    templates: TemplateEngine,
}

impl<'a> AlertMapper<'a> {
    pub fn new(config: &'a HandlerConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Alert message: the message template, cut to the message limit.
    pub fn title(&self, event: &Event) -> String {
        let title = self
            .templates
            .render_or_empty("title", &self.config.message_template, event);
        trim(&title, self.config.message_limit).to_string()
    }

    /// Alert alias. Never templated, so resolutions always find their alert.
    pub fn alias(&self, event: &Event) -> String {
        event.alias()
    }

    /// One tag per tag template. A single failing template empties the whole list.
    pub fn tags(&self, event: &Event) -> Vec<String> {
        let mut tags = Vec::with_capacity(self.config.tag_templates.len());
        for source in &self.config.tag_templates {
            match self.templates.render("tags", source, event) {
                Ok(tag) => tags.push(tag),
                Err(e) => {
                    tracing::warn!(error = %e, "Tag template render failed, sending no tags");
                    return Vec::new();
                }
            }
        }
        tags
    }

    /// Alert description with literal `\n` sequences expanded, cut to the description limit.
    pub fn description(&self, event: &Event) -> String {
        let description =
            self.templates
                .render_or_empty("description", &self.config.description_template, event);
        let description = description.replace("\\n", "\n");
        trim(&description, self.config.description_limit).to_string()
    }

    /// Alert details: check result fields plus whatever the toggles enable.
    pub fn details(&self, event: &Event) -> BTreeMap<String, String> {
        let check = &event.check;
        let entity = &event.entity;
        let mut details = BTreeMap::new();

        details.insert("output".to_string(), check.output.clone());
        details.insert("command".to_string(), check.command.clone());
        details.insert(
            "proxy_entity_name".to_string(),
            check.proxy_entity_name.clone(),
        );
        details.insert("state".to_string(), check.state.clone());
        details.insert("status".to_string(), check.status.to_string());
        details.insert("occurrences".to_string(), check.occurrences.to_string());
        details.insert(
            "occurrences_watermark".to_string(),
            check.occurrences_watermark.to_string(),
        );

        if self.config.full_details {
            details.insert("ttl".to_string(), check.ttl.to_string());
            details.insert("interval".to_string(), check.interval.to_string());
            details.insert("subscriptions".to_string(), format_list(&check.subscriptions));
            details.insert("handlers".to_string(), format_list(&check.handlers));

            if entity.entity_class == "agent" {
                let system = &entity.system;
                details.insert("arch".to_string(), system.arch.clone());
                details.insert("os".to_string(), system.os.clone());
                details.insert("platform".to_string(), system.platform.clone());
                details.insert(
                    "platform_family".to_string(),
                    system.platform_family.clone(),
                );
                details.insert(
                    "platform_version".to_string(),
                    system.platform_version.clone(),
                );
            }
        }

        if self.config.with_annotations {
            let annotations = [
                ("check", &check.metadata.annotations),
                ("entity", &entity.metadata.annotations),
            ];
            for (owner, map) in annotations {
                for (key, value) in map {
                    // Handler configuration stays out of the alert.
                    if key.contains(KEYSPACE) {
                        continue;
                    }
                    details.insert(format!("{}_annotation_{}", owner, key), value.clone());
                }
            }
        }

        if self.config.with_labels {
            let labels = [
                ("check", &check.metadata.labels),
                ("entity", &entity.metadata.labels),
            ];
            for (owner, map) in labels {
                for (key, value) in map {
                    details.insert(format!("{}_label_{}", owner, key), value.clone());
                }
            }
        }

        if !self.config.sensu_dashboard.is_empty() {
            details.insert(
                "sensuDashboard".to_string(),
                format!(
                    "source: {}/{}/events/{}/{} \n",
                    self.config.sensu_dashboard,
                    entity.metadata.namespace,
                    entity.metadata.name,
                    check.metadata.name
                ),
            );
        }

        details
    }
}

/// Note body carrying the whole event as JSON, for people reading the alert.
pub fn note(event: &Event) -> Result<String, serde_json::Error> {
    let event_json = serde_json::to_string(event)?;
    Ok(format!("{}{}", NOTE_HEADER, event_json))
}

/// Returns at most the first `limit` bytes of `s`.
///
/// OpsGenie limits are byte counts. When `limit` falls inside a multi-byte
/// character the cut moves back to the start of that character, so the
/// result can be up to three bytes shorter than `limit`.
pub fn trim(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// `[a b c]`, the list format Sensu users see in other handlers' output.
fn format_list(items: &[String]) -> String {
    format!("[{}]", items.join(" "))
}

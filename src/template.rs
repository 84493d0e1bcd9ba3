//! Template evaluation for alert titles, descriptions and tags.
//!
//! Templates use Jinja2 syntax powered by minijinja and are rendered
//! against the event as Sensu serializes it. For convenience the
//! `name`, `namespace`, `labels` and `annotations` of the entity and the
//! check are also reachable without going through `metadata`:
//!
//! ```text
//! {{ entity.name }}/{{ check.name }}    ==    {{ entity.metadata.name }}/{{ check.metadata.name }}
//! ```
//!
//! Render failures are returned as errors; the mapper decides to degrade
//! them to empty values.

use crate::error::TemplateError;
use crate::event::Event;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::{Map, Value};

/// Keys copied from `metadata` onto the entity and check objects.
const METADATA_SHORTCUTS: [&str; 4] = ["name", "namespace", "labels", "annotations"];

/// Template engine for rendering handler templates with Jinja2 syntax.
///
/// Missing fields render as empty strings instead of failing, so a
/// template referencing an absent label still produces output.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Lenient);
        Self { env }
    }

    /// Render `source` against `event`.
    ///
    /// `name` only identifies the template in errors and logs
    /// (`"title"`, `"description"`, `"tags"`).
    pub fn render(&self, name: &str, source: &str, event: &Event) -> Result<String, TemplateError> {
        tracing::trace!(template = %name, "Starting template render");

        let context = event_context(event).map_err(|e| TemplateError::RenderFailed {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        self.env
            .render_str(source, &context)
            .map_err(|e| TemplateError::RenderFailed {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Render `source`, substituting an empty string when rendering fails.
    pub fn render_or_empty(&self, name: &str, source: &str, event: &Event) -> String {
        match self.render(name, source, event) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(template = %name, error = %e, "Template render failed, using empty value");
                String::new()
            }
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("undefined_behavior", &"lenient")
            .finish()
    }
}

/// Build the render context for `event`.
fn event_context(event: &Event) -> Result<Value, serde_json::Error> {
    let mut context = serde_json::to_value(event)?;

    for object in ["entity", "check"] {
        let Some(target) = context.get_mut(object).and_then(Value::as_object_mut) else {
            continue;
        };
        let Some(metadata) = target.get_mut("metadata").and_then(Value::as_object_mut) else {
            continue;
        };
        // Empty maps are skipped on serialization; lookups into them must still resolve.
        for key in ["labels", "annotations"] {
            metadata
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let metadata = metadata.clone();
        for key in METADATA_SHORTCUTS {
            if target.contains_key(key) {
                continue;
            }
            if let Some(value) = metadata.get(key) {
                target.insert(key.to_string(), value.clone());
            }
        }
    }

    Ok(context)
}

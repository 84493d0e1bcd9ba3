//! Handler configuration.
//!
//! The configuration is resolved once per run from flags, environment and
//! defaults, refined by the event's annotations, validated, and then
//! passed explicitly to every stage.

mod overrides;
mod secret;
mod types;
mod validation;

pub use secret::SecretString;
pub use types::{
    ApiRegion, DEFAULT_DESCRIPTION_LIMIT, DEFAULT_DESCRIPTION_TEMPLATE, DEFAULT_MESSAGE_LIMIT,
    DEFAULT_MESSAGE_TEMPLATE, DEFAULT_PRIORITY, DEFAULT_REGION, HandlerConfig, KEYSPACE,
    PLUGIN_NAME, default_tag_templates,
};

//! Centralized error types for the handler using thiserror.
//!
//! Template failures are recoverable (callers substitute an empty value),
//! lookup and close failures are logged by the synchronizer, and only
//! configuration, event decoding and create failures end the run.

use thiserror::Error;

/// Errors related to handler configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("authentication token is empty")]
    MissingAuthToken,
    #[error("team is empty")]
    MissingTeam,
    /// An annotation override carried a value that does not parse for its option.
    #[error("invalid value for annotation '{key}': {message}")]
    InvalidOverride { key: String, message: String },
}

/// Errors related to reading the monitoring event.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("failed to read event: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid event JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("event is missing {0}")]
    MissingField(&'static str),
}

/// Errors related to template rendering.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template '{name}' render failed: {message}")]
    RenderFailed { name: String, message: String },
}

/// Errors returned by the OpsGenie API client.
#[derive(Error, Debug)]
pub enum OpsgenieError {
    #[error("invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("OpsGenie API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Errors that end a handler run.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("failed to build alert note: {0}")]
    Note(#[source] serde_json::Error),
    #[error("failed to create alert: {0}")]
    Create(#[source] OpsgenieError),
}

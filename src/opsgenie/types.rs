//! Request and response bodies of the OpsGenie alert API.

use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of responder attached to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderType {
    Escalation,
    Schedule,
}

/// Responder referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Responder {
    #[serde(rename = "type")]
    pub kind: ResponderType,
    pub name: String,
}

impl Responder {
    pub fn new(kind: ResponderType, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

/// Body of `POST /v2/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub message: String,
    pub alias: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub responders: Vec<Responder>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub details: BTreeMap<String, String>,
    pub entity: String,
    pub source: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of `POST /v2/alerts/{id}/close`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseAlertRequest {
    pub source: String,
    pub note: String,
}

/// Acknowledgement of an asynchronous alert request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub took: f64,
    pub request_id: String,
}

/// Alert as returned by `GET /v2/alerts/{identifier}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertInfo {
    pub id: String,
    #[serde(default)]
    pub tiny_id: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub count: u64,
}

/// Envelope of `GET /v2/alerts/{identifier}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetAlertResponse {
    pub data: AlertInfo,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

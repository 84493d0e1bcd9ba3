//! OpsGenie alert API integration.
//!
//! The synchronizer only talks to the [`AlertClient`] trait;
//! [`OpsgenieClient`] implements it over the OpsGenie v2 REST API.

mod client;
mod traits;
mod types;

pub use client::{OpsgenieClient, REQUEST_TIMEOUT};
pub use traits::AlertClient;
pub use types::{
    AlertInfo, CloseAlertRequest, CreateAlertRequest, RequestResult, Responder, ResponderType,
};

/// OpsGenie API base URL for the US region.
pub const API_URL: &str = "https://api.opsgenie.com";

/// OpsGenie API base URL for the EU region.
pub const API_URL_EU: &str = "https://api.eu.opsgenie.com";

/// Source recorded on every alert this handler creates or closes.
pub const SOURCE: &str = "Sensu Go";

/// Note attached when an alert is closed by a resolution event.
pub const CLOSE_NOTE: &str = "Closed Automatically";

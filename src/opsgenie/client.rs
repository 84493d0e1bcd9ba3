//! OpsGenie REST client.
//!
//! Implements [`AlertClient`] against the v2 alert API with one request
//! per call, a fixed per-request timeout and no retries.

use super::types::{ApiErrorBody, GetAlertResponse};
use super::{AlertClient, AlertInfo, CloseAlertRequest, CreateAlertRequest, RequestResult};
use crate::config::SecretString;
use crate::error::OpsgenieError;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;

/// Upper bound for each API call; a call that takes longer is a failure.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OpsGenie alert API client.
pub struct OpsgenieClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl OpsgenieClient {
    /// Create a client for `base_url` (e.g. `https://api.eu.opsgenie.com`).
    ///
    /// # Errors
    ///
    /// * `OpsgenieError::InvalidUrl` - `base_url` is not an absolute http(s) URL
    /// * `OpsgenieError::Request` - the HTTP client could not be built
    pub fn new(base_url: &str, api_key: SecretString) -> Result<Self, OpsgenieError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_http_client(client, base_url, api_key)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: SecretString,
    ) -> Result<Self, OpsgenieError> {
        let invalid = |message: &str| OpsgenieError::InvalidUrl {
            url: base_url.to_string(),
            message: message.to_string(),
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("expected an http or https base URL"));
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_key,
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment.
    ///
    /// Aliases contain `/`, which must stay inside a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn auth_header(&self) -> String {
        format!("GenieKey {}", self.api_key.expose())
    }
}

/// Decode a successful response, or turn a non-2xx response into `OpsgenieError::Api`.
async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, OpsgenieError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(OpsgenieError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl AlertClient for OpsgenieClient {
    async fn create(&self, request: &CreateAlertRequest) -> Result<RequestResult, OpsgenieError> {
        let span = tracing::info_span!("opsgenie_create", alias = %request.alias);

        async {
            let response = self
                .client
                .post(self.endpoint(&["v2", "alerts"]))
                .header(AUTHORIZATION, self.auth_header())
                .json(request)
                .send()
                .await?;
            tracing::debug!(status = %response.status(), "Create request answered");
            read_response(response).await
        }
        .instrument(span)
        .await
    }

    async fn get_by_alias(&self, alias: &str) -> Result<AlertInfo, OpsgenieError> {
        let span = tracing::info_span!("opsgenie_get", alias = %alias);

        async {
            let response = self
                .client
                .get(self.endpoint(&["v2", "alerts", alias]))
                .query(&[("identifierType", "alias")])
                .header(AUTHORIZATION, self.auth_header())
                .send()
                .await?;
            tracing::debug!(status = %response.status(), "Get request answered");
            let found: GetAlertResponse = read_response(response).await?;
            Ok(found.data)
        }
        .instrument(span)
        .await
    }

    async fn close(
        &self,
        alert_id: &str,
        request: &CloseAlertRequest,
    ) -> Result<RequestResult, OpsgenieError> {
        let span = tracing::info_span!("opsgenie_close", alert_id = %alert_id);

        async {
            let response = self
                .client
                .post(self.endpoint(&["v2", "alerts", alert_id, "close"]))
                .query(&[("identifierType", "id")])
                .header(AUTHORIZATION, self.auth_header())
                .json(request)
                .send()
                .await?;
            tracing::debug!(status = %response.status(), "Close request answered");
            read_response(response).await
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for OpsgenieClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpsgenieClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key)
            .finish()
    }
}

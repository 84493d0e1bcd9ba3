//! Alert client trait definition.

use async_trait::async_trait;

use super::{AlertInfo, CloseAlertRequest, CreateAlertRequest, RequestResult};
use crate::error::OpsgenieError;

/// Operations the synchronizer needs from the incident-management service.
///
/// Implementations own transport concerns (auth, timeouts). They must not
/// retry on their own behalf; one call is one request.
#[async_trait]
pub trait AlertClient: Send + Sync {
    /// Create an alert. The service deduplicates on alias.
    async fn create(&self, request: &CreateAlertRequest) -> Result<RequestResult, OpsgenieError>;

    /// Fetch the alert currently registered under `alias`.
    async fn get_by_alias(&self, alias: &str) -> Result<AlertInfo, OpsgenieError>;

    /// Close the alert with the service-assigned identifier `alert_id`.
    async fn close(
        &self,
        alert_id: &str,
        request: &CloseAlertRequest,
    ) -> Result<RequestResult, OpsgenieError>;
}

impl std::fmt::Debug for dyn AlertClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertClient").finish_non_exhaustive()
    }
}

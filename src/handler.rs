//! Alert synchronization: the create / close decision for one event.
//!
//! ```text
//! status != 0  ──────────────────────────────► create (always)
//! status == 0  ──► lookup by alias ──found───► close by id
//!                                  └─missing─► nothing
//! ```
//!
//! Lookup failures count as "missing". Close failures are reported and
//! swallowed; create failures end the run. Each outcome prints one status
//! line on stdout for the Sensu handler log.

use crate::config::HandlerConfig;
use crate::error::HandlerError;
use crate::event::Event;
use crate::mapper::{self, AlertMapper};
use crate::opsgenie::{
    AlertClient, CLOSE_NOTE, CloseAlertRequest, CreateAlertRequest, Responder, ResponderType,
    SOURCE,
};
use crate::priority::Priority;
use std::sync::Arc;
use tracing::Instrument;

/// What a handler run did to the external alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A create request was accepted.
    Created { request_id: String },
    /// The open alert was closed.
    Closed { alert_id: String, request_id: String },
    /// The close request failed; the alert is probably still open.
    CloseFailed { alert_id: String, error: String },
    /// Resolution event without an open alert.
    NoAlert,
}

/// Synchronizes one event with the alert service.
#[derive(Debug)]
pub struct AlertSynchronizer {
    config: HandlerConfig,
    client: Arc<dyn AlertClient>,
}

impl AlertSynchronizer {
    pub fn new(config: HandlerConfig, client: Arc<dyn AlertClient>) -> Self {
        Self { config, client }
    }

    /// Handle one event.
    ///
    /// # Errors
    ///
    /// * `HandlerError::Note` - the event could not be serialized into the note
    /// * `HandlerError::Create` - the alert service rejected or did not answer the create
    pub async fn execute(&self, event: &Event) -> Result<Outcome, HandlerError> {
        let span = tracing::info_span!(
            "handle_event",
            alias = %event.alias(),
            status = event.check.status
        );

        async {
            if !event.is_resolved() {
                return self.create_alert(event).await;
            }

            match self.find_alert_id(event).await {
                Some(alert_id) => Ok(self.close_alert(&alert_id).await),
                None => {
                    tracing::info!("No open alert for resolved event");
                    Ok(Outcome::NoAlert)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Build the create request for a problem event.
    pub fn create_request(&self, event: &Event) -> Result<CreateAlertRequest, HandlerError> {
        let mapper = AlertMapper::new(&self.config);

        let note = if self.config.include_event_in_note {
            Some(mapper::note(event).map_err(HandlerError::Note)?)
        } else {
            None
        };

        // One escalation and one schedule responder for the same team; routing
        // rules on either side must match.
        let responders = vec![
            Responder::new(ResponderType::Escalation, &self.config.team),
            Responder::new(ResponderType::Schedule, &self.config.team),
        ];

        Ok(CreateAlertRequest {
            message: mapper.title(event),
            alias: mapper.alias(event),
            description: mapper.description(event),
            responders,
            actions: self.config.actions.clone(),
            tags: mapper.tags(event),
            details: mapper.details(event),
            entity: event.entity.metadata.name.clone(),
            source: SOURCE.to_string(),
            priority: Priority::resolve(&self.config.priority),
            note,
        })
    }

    async fn create_alert(&self, event: &Event) -> Result<Outcome, HandlerError> {
        let request = self.create_request(event)?;

        match self.client.create(&request).await {
            Ok(result) => {
                tracing::info!(
                    request_id = %result.request_id,
                    priority = %request.priority,
                    result = %result.result,
                    took = result.took,
                    "Alert create accepted"
                );
                println!("Create request ID: {}", result.request_id);
                Ok(Outcome::Created {
                    request_id: result.request_id,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "Alert create failed");
                println!("{}", e);
                Err(HandlerError::Create(e))
            }
        }
    }

    /// Best-effort lookup of the open alert's id; any failure means "not found".
    async fn find_alert_id(&self, event: &Event) -> Option<String> {
        match self.client.get_by_alias(&event.alias()).await {
            Ok(alert) => {
                tracing::debug!(
                    alert_id = %alert.id,
                    tiny_id = %alert.tiny_id,
                    alias = %alert.alias,
                    status = %alert.status,
                    "Open alert found"
                );
                println!(
                    "ID: {}, Message: {}, Count: {} ",
                    alert.id, alert.message, alert.count
                );
                Some(alert.id)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Alert lookup failed, treating as not found");
                None
            }
        }
    }

    async fn close_alert(&self, alert_id: &str) -> Outcome {
        let request = CloseAlertRequest {
            source: SOURCE.to_string(),
            note: CLOSE_NOTE.to_string(),
        };

        match self.client.close(alert_id, &request).await {
            Ok(result) => {
                tracing::info!(
                    alert_id = %alert_id,
                    request_id = %result.request_id,
                    result = %result.result,
                    took = result.took,
                    "Alert close accepted"
                );
                println!("RequestID {} to Close {}", alert_id, result.request_id);
                Outcome::Closed {
                    alert_id: alert_id.to_string(),
                    request_id: result.request_id,
                }
            }
            Err(e) => {
                tracing::error!(alert_id = %alert_id, error = %e, "Alert close failed");
                println!("[ERROR] Not Closed: {}", e);
                Outcome::CloseFailed {
                    alert_id: alert_id.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;
    use crate::error::OpsgenieError;
    use crate::opsgenie::{AlertInfo, RequestResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records calls and answers from canned results.
    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<String>>,
        existing_alert: Option<String>,
        fail_create: bool,
        fail_close: bool,
    }

    impl RecordingClient {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AlertClient for RecordingClient {
        async fn create(
            &self,
            request: &CreateAlertRequest,
        ) -> Result<RequestResult, OpsgenieError> {
            self.calls.lock().unwrap().push(format!("create {}", request.alias));
            if self.fail_create {
                return Err(OpsgenieError::Api {
                    status: 422,
                    message: "Request body is not processable".to_string(),
                });
            }
            Ok(RequestResult {
                result: "Request will be processed".to_string(),
                took: 0.1,
                request_id: "req-create".to_string(),
            })
        }

        async fn get_by_alias(&self, alias: &str) -> Result<AlertInfo, OpsgenieError> {
            self.calls.lock().unwrap().push(format!("get {}", alias));
            match &self.existing_alert {
                Some(id) => Ok(AlertInfo {
                    id: id.clone(),
                    tiny_id: "1".to_string(),
                    alias: alias.to_string(),
                    message: alias.to_string(),
                    status: "open".to_string(),
                    count: 2,
                }),
                None => Err(OpsgenieError::Api {
                    status: 404,
                    message: "Alert does not exist".to_string(),
                }),
            }
        }

        async fn close(
            &self,
            alert_id: &str,
            request: &CloseAlertRequest,
        ) -> Result<RequestResult, OpsgenieError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("close {} {}", alert_id, request.note));
            if self.fail_close {
                return Err(OpsgenieError::Api {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok(RequestResult {
                result: "Request will be processed".to_string(),
                took: 0.1,
                request_id: "req-close".to_string(),
            })
        }
    }

    fn config() -> HandlerConfig {
        HandlerConfig {
            auth_token: SecretString::new("test_token".to_string()),
            team: "ops".to_string(),
            ..Default::default()
        }
    }

    fn problem_event() -> Event {
        let mut event = Event::fixture("entity1", "check1");
        event.check.status = 1;
        event.check.output = "WARNING: disk 91%".to_string();
        event
    }

    #[tokio::test]
    async fn problem_event_creates_alert() {
        let client = Arc::new(RecordingClient::default());
        let sync = AlertSynchronizer::new(config(), client.clone());

        let outcome = sync.execute(&problem_event()).await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Created {
                request_id: "req-create".to_string()
            }
        );
        assert_eq!(client.calls(), vec!["create entity1/check1"]);
    }

    #[tokio::test]
    async fn create_is_unconditional_for_repeated_problems() {
        let client = Arc::new(RecordingClient {
            existing_alert: Some("already-open".to_string()),
            ..Default::default()
        });
        let sync = AlertSynchronizer::new(config(), client.clone());

        sync.execute(&problem_event()).await.unwrap();
        sync.execute(&problem_event()).await.unwrap();

        assert_eq!(
            client.calls(),
            vec!["create entity1/check1", "create entity1/check1"]
        );
    }

    #[tokio::test]
    async fn create_failure_is_returned() {
        let client = Arc::new(RecordingClient {
            fail_create: true,
            ..Default::default()
        });
        let sync = AlertSynchronizer::new(config(), client);

        let err = sync.execute(&problem_event()).await.unwrap_err();
        assert!(matches!(err, HandlerError::Create(_)));
    }

    #[tokio::test]
    async fn resolved_event_closes_found_alert() {
        let client = Arc::new(RecordingClient {
            existing_alert: Some("alert-123".to_string()),
            ..Default::default()
        });
        let sync = AlertSynchronizer::new(config(), client.clone());

        let outcome = sync
            .execute(&Event::fixture("entity1", "check1"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Closed {
                alert_id: "alert-123".to_string(),
                request_id: "req-close".to_string()
            }
        );
        assert_eq!(
            client.calls(),
            vec!["get entity1/check1", "close alert-123 Closed Automatically"]
        );
    }

    #[tokio::test]
    async fn resolved_event_without_alert_does_nothing() {
        let client = Arc::new(RecordingClient::default());
        let sync = AlertSynchronizer::new(config(), client.clone());

        let outcome = sync
            .execute(&Event::fixture("entity1", "check1"))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoAlert);
        assert_eq!(client.calls(), vec!["get entity1/check1"]);
    }

    #[tokio::test]
    async fn close_failure_is_not_an_error() {
        let client = Arc::new(RecordingClient {
            existing_alert: Some("alert-123".to_string()),
            fail_close: true,
            ..Default::default()
        });
        let sync = AlertSynchronizer::new(config(), client);

        let outcome = sync
            .execute(&Event::fixture("entity1", "check1"))
            .await
            .unwrap();

        match outcome {
            Outcome::CloseFailed { alert_id, error } => {
                assert_eq!(alert_id, "alert-123");
                assert!(error.contains("500"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn create_request_carries_both_responders() {
        let sync = AlertSynchronizer::new(config(), Arc::new(RecordingClient::default()));
        let request = sync.create_request(&problem_event()).unwrap();

        assert_eq!(
            request.responders,
            vec![
                Responder::new(ResponderType::Escalation, "ops"),
                Responder::new(ResponderType::Schedule, "ops"),
            ]
        );
    }

    #[test]
    fn create_request_fields() {
        let config = HandlerConfig {
            priority: "P2".to_string(),
            actions: vec!["restart".to_string()],
            ..config()
        };
        let sync = AlertSynchronizer::new(config, Arc::new(RecordingClient::default()));
        let request = sync.create_request(&problem_event()).unwrap();

        assert_eq!(request.message, "entity1/check1");
        assert_eq!(request.alias, "entity1/check1");
        assert_eq!(request.description, "WARNING: disk 91%");
        assert_eq!(request.entity, "entity1");
        assert_eq!(request.source, "Sensu Go");
        assert_eq!(request.priority, Priority::P2);
        assert_eq!(request.actions, vec!["restart"]);
        assert_eq!(request.tags, vec!["entity1", "check1", "default", "host"]);
        assert_eq!(request.details["status"], "1");
        assert!(request.note.is_none());
    }

    #[test]
    fn create_request_includes_note_when_enabled() {
        let config = HandlerConfig {
            include_event_in_note: true,
            ..config()
        };
        let sync = AlertSynchronizer::new(config, Arc::new(RecordingClient::default()));
        let request = sync.create_request(&problem_event()).unwrap();

        let note = request.note.unwrap();
        assert!(note.starts_with("Event data update:\n\n"));
        assert!(note.contains("\"output\":\"WARNING: disk 91%\""));
    }
}

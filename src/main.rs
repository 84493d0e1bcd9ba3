//! sensu-opsgenie-handler - open and close OpsGenie alerts from Sensu Go events.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use sensu_opsgenie_handler::cli::{Cli, LogFormat};
use sensu_opsgenie_handler::error::EventError;
use sensu_opsgenie_handler::{AlertSynchronizer, Event, HandlerConfig, OpsgenieClient};

/// Initialize the tracing subscriber with the specified log format.
///
/// Logs go to stderr; stdout carries only the per-request status lines.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

/// Read the event from `path`, or from stdin as Sensu pipes it.
fn read_event(path: Option<&Path>) -> Result<Event, EventError> {
    match path {
        Some(path) => Event::from_reader(File::open(path)?),
        None => Event::from_reader(std::io::stdin().lock()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    let event = match read_event(cli.event_file.as_deref()) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Failed to read event");
            std::process::exit(1);
        }
    };

    // Annotation overrides apply before validation so a team can come from the entity.
    let config = match cli.handler_config().with_event_overrides(&event) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration override");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.check_args() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    info!(
        alias = %event.alias(),
        status = event.check.status,
        api_url = %config.api_base_url(),
        "Handling event"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(config, event))
}

/// Synchronize the event with OpsGenie.
async fn run(config: HandlerConfig, event: Event) -> Result<()> {
    let client = OpsgenieClient::new(config.api_base_url(), config.auth_token.clone())?;
    let synchronizer = AlertSynchronizer::new(config, Arc::new(client));

    match synchronizer.execute(&event).await {
        Ok(outcome) => {
            info!(?outcome, "Event handled");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Event handling failed");
            Err(e.into())
        }
    }
}

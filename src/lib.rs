//! Sensu Go handler that keeps OpsGenie alerts in step with check results.
//!
//! A problem event (check status non-zero) creates an alert keyed by the
//! `<entity>/<check>` alias; a resolution event closes the alert found
//! under that alias.

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod mapper;
pub mod opsgenie;
pub mod priority;
pub mod template;

// Re-export commonly used types
pub use cli::{Cli, LogFormat};
pub use config::HandlerConfig;
pub use event::Event;
pub use handler::{AlertSynchronizer, Outcome};
pub use mapper::{AlertMapper, trim};
pub use opsgenie::{AlertClient, OpsgenieClient};
pub use priority::Priority;
pub use template::TemplateEngine;

//! Command-line interface using clap.
//!
//! Every option can also come from an `OPSGENIE_*` environment variable
//! where one is listed, flags taking precedence. Long options keep the
//! camelCase spelling used in Sensu handler definitions; the kebab-case
//! spelling is accepted as an alias.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_DESCRIPTION_LIMIT, DEFAULT_DESCRIPTION_TEMPLATE, DEFAULT_MESSAGE_LIMIT,
    DEFAULT_MESSAGE_TEMPLATE, DEFAULT_PRIORITY, DEFAULT_REGION, HandlerConfig, SecretString,
    default_tag_templates,
};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// The Sensu Go OpsGenie handler for incident management.
#[derive(Parser, Debug)]
#[command(name = "sensu-opsgenie-handler")]
#[command(version)]
#[command(about = "The Sensu Go OpsGenie handler for incident management")]
pub struct Cli {
    /// The OpsGenie API region (us or eu).
    #[arg(short = 'r', long = "region", env = "OPSGENIE_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Explicit OpsGenie API base URL; takes precedence over the region.
    #[arg(long = "apiUrl", alias = "api-url", env = "OPSGENIE_API_URL")]
    pub api_url: Option<String>,

    /// The OpsGenie V2 API authentication token.
    #[arg(
        short = 'a',
        long = "auth",
        env = "OPSGENIE_AUTHTOKEN",
        default_value = "",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub auth: SecretString,

    /// The OpsGenie team to notify.
    #[arg(short = 't', long = "team", env = "OPSGENIE_TEAM", default_value = "")]
    pub team: String,

    /// Sensu dashboard base URL used to link alerts back to the event,
    /// e.g. http://sensu-dashboard.example.local/c/~/n
    #[arg(
        short = 's',
        long = "sensuDashboard",
        alias = "sensu-dashboard",
        env = "OPSGENIE_SENSU_DASHBOARD",
        default_value = ""
    )]
    pub sensu_dashboard: String,

    /// The template for the alert message.
    #[arg(
        short = 'm',
        long = "messageTemplate",
        alias = "message-template",
        env = "OPSGENIE_MESSAGE_TEMPLATE",
        default_value = DEFAULT_MESSAGE_TEMPLATE
    )]
    pub message_template: String,

    /// The maximum length of the message field, in bytes.
    #[arg(
        short = 'l',
        long = "messageLimit",
        alias = "message-limit",
        env = "OPSGENIE_MESSAGE_LIMIT",
        default_value_t = DEFAULT_MESSAGE_LIMIT
    )]
    pub message_limit: usize,

    /// The template for the alert description.
    #[arg(
        short = 'd',
        long = "descriptionTemplate",
        alias = "description-template",
        env = "OPSGENIE_DESCRIPTION_TEMPLATE",
        default_value = DEFAULT_DESCRIPTION_TEMPLATE
    )]
    pub description_template: String,

    /// The maximum length of the description field, in bytes.
    #[arg(
        short = 'L',
        long = "descriptionLimit",
        alias = "description-limit",
        env = "OPSGENIE_DESCRIPTION_LIMIT",
        default_value_t = DEFAULT_DESCRIPTION_LIMIT
    )]
    pub description_limit: usize,

    /// Include the event JSON in a note on the alert.
    #[arg(short = 'i', long = "includeEventInNote", alias = "include-event-in-note")]
    pub include_event_in_note: bool,

    /// The OpsGenie alert priority (P1 to P5).
    #[arg(short = 'p', long = "priority", env = "OPSGENIE_PRIORITY", default_value = DEFAULT_PRIORITY)]
    pub priority: String,

    /// OpsGenie custom actions to attach to the alert.
    #[arg(short = 'A', long = "actions", value_delimiter = ',')]
    pub actions: Vec<String>,

    /// Include entity and check annotations in the alert details.
    #[arg(short = 'w', long = "withAnnotations", alias = "with-annotations")]
    pub with_annotations: bool,

    /// Include entity and check labels in the alert details.
    #[arg(short = 'W', long = "withLabels", alias = "with-labels")]
    pub with_labels: bool,

    /// Include more details: ttl, interval, subscriptions, handlers and agent platform.
    #[arg(short = 'F', long = "fullDetails", alias = "full-details")]
    pub full_details: bool,

    /// Template for one alert tag; repeat the flag for several tags.
    #[arg(
        short = 'T',
        long = "tagTemplate",
        alias = "tag-template",
        default_values_t = default_tag_templates()
    )]
    pub tag_templates: Vec<String>,

    /// Read the event from this file instead of standard input.
    #[arg(long = "eventFile", alias = "event-file")]
    pub event_file: Option<PathBuf>,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Configuration value for this run, before annotation overrides.
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            api_region: self.region.clone(),
            api_url: self.api_url.clone(),
            auth_token: self.auth.clone(),
            team: self.team.clone(),
            sensu_dashboard: self.sensu_dashboard.clone(),
            message_template: self.message_template.clone(),
            message_limit: self.message_limit,
            description_template: self.description_template.clone(),
            description_limit: self.description_limit,
            include_event_in_note: self.include_event_in_note,
            priority: self.priority.clone(),
            actions: self.actions.clone(),
            with_annotations: self.with_annotations,
            with_labels: self.with_labels,
            full_details: self.full_details,
            tag_templates: self.tag_templates.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const OPSGENIE_VARS: [&str; 8] = [
        "OPSGENIE_REGION",
        "OPSGENIE_API_URL",
        "OPSGENIE_AUTHTOKEN",
        "OPSGENIE_TEAM",
        "OPSGENIE_SENSU_DASHBOARD",
        "OPSGENIE_MESSAGE_TEMPLATE",
        "OPSGENIE_MESSAGE_LIMIT",
        "OPSGENIE_PRIORITY",
    ];

    /// Parse with every OPSGENIE_* variable unset.
    fn parse_clean(args: &[&str]) -> Cli {
        let unset: Vec<(&str, Option<&str>)> =
            OPSGENIE_VARS.iter().map(|v| (*v, None)).collect();
        temp_env::with_vars(unset, || Cli::try_parse_from(args).unwrap())
    }

    #[test]
    #[serial]
    fn cli_defaults_match_handler_defaults() {
        let cli = parse_clean(&["sensu-opsgenie-handler"]);
        assert_eq!(cli.handler_config(), HandlerConfig::default());
        assert!(cli.event_file.is_none());
        assert!(matches!(cli.log_format, LogFormat::Text));
    }

    #[test]
    #[serial]
    fn cli_short_flags() {
        let cli = parse_clean(&[
            "sensu-opsgenie-handler",
            "-a",
            "token",
            "-t",
            "ops",
            "-r",
            "eu",
            "-p",
            "P1",
            "-l",
            "50",
            "-L",
            "500",
            "-i",
            "-w",
            "-W",
            "-F",
        ]);
        let config = cli.handler_config();

        assert_eq!(config.auth_token.expose(), "token");
        assert_eq!(config.team, "ops");
        assert_eq!(config.api_region, "eu");
        assert_eq!(config.priority, "P1");
        assert_eq!(config.message_limit, 50);
        assert_eq!(config.description_limit, 500);
        assert!(config.include_event_in_note);
        assert!(config.with_annotations);
        assert!(config.with_labels);
        assert!(config.full_details);
    }

    #[test]
    #[serial]
    fn cli_camel_case_and_kebab_case_long_flags() {
        let camel = parse_clean(&[
            "sensu-opsgenie-handler",
            "--messageTemplate",
            "{{ check.name }}",
            "--sensuDashboard",
            "http://sensu.local/c/~/n",
        ]);
        let kebab = parse_clean(&[
            "sensu-opsgenie-handler",
            "--message-template",
            "{{ check.name }}",
            "--sensu-dashboard",
            "http://sensu.local/c/~/n",
        ]);

        assert_eq!(camel.message_template, "{{ check.name }}");
        assert_eq!(camel.handler_config(), kebab.handler_config());
    }

    #[test]
    #[serial]
    fn cli_actions_split_on_commas() {
        let cli = parse_clean(&["sensu-opsgenie-handler", "-A", "restart,ping", "-A", "page"]);
        assert_eq!(cli.actions, vec!["restart", "ping", "page"]);
    }

    #[test]
    #[serial]
    fn cli_tag_templates_replace_defaults() {
        let cli = parse_clean(&[
            "sensu-opsgenie-handler",
            "-T",
            "{{ entity.name }}",
            "-T",
            "{{ check.labels | join(',') }}",
        ]);
        assert_eq!(
            cli.tag_templates,
            vec!["{{ entity.name }}", "{{ check.labels | join(',') }}"]
        );
    }

    #[test]
    #[serial]
    fn cli_reads_environment() {
        temp_env::with_vars(
            [
                ("OPSGENIE_AUTHTOKEN", Some("env-token")),
                ("OPSGENIE_TEAM", Some("env-team")),
                ("OPSGENIE_REGION", Some("EU")),
                ("OPSGENIE_MESSAGE_LIMIT", Some("64")),
            ],
            || {
                let cli = Cli::try_parse_from(["sensu-opsgenie-handler"]).unwrap();
                let config = cli.handler_config();
                assert_eq!(config.auth_token.expose(), "env-token");
                assert_eq!(config.team, "env-team");
                assert_eq!(config.api_region, "EU");
                assert_eq!(config.message_limit, 64);
            },
        );
    }

    #[test]
    #[serial]
    fn cli_flag_overrides_environment() {
        temp_env::with_var("OPSGENIE_TEAM", Some("env-team"), || {
            let cli = Cli::try_parse_from(["sensu-opsgenie-handler", "--team", "flag-team"]).unwrap();
            assert_eq!(cli.team, "flag-team");
        });
    }

    #[test]
    #[serial]
    fn cli_debug_does_not_leak_token() {
        let cli = parse_clean(&["sensu-opsgenie-handler", "--auth", "super-secret-key"]);
        assert!(!format!("{:?}", cli).contains("super-secret-key"));
    }

    #[test]
    #[serial]
    fn cli_invalid_limit_rejected() {
        let unset: Vec<(&str, Option<&str>)> =
            OPSGENIE_VARS.iter().map(|v| (*v, None)).collect();
        temp_env::with_vars(unset, || {
            let result = Cli::try_parse_from(["sensu-opsgenie-handler", "--messageLimit", "-5"]);
            assert!(result.is_err());
        });
    }

    #[test]
    #[serial]
    fn cli_log_format_invalid_rejected() {
        let result = Cli::try_parse_from(["sensu-opsgenie-handler", "--log-format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn cli_log_format_from_env() {
        temp_env::with_var("LOG_FORMAT", Some("json"), || {
            let cli = Cli::try_parse_from(["sensu-opsgenie-handler"]).unwrap();
            assert!(matches!(cli.log_format, LogFormat::Json));
        });
    }

    #[test]
    #[serial]
    fn cli_event_file() {
        let cli = parse_clean(&["sensu-opsgenie-handler", "--eventFile", "/tmp/event.json"]);
        assert_eq!(cli.event_file, Some(PathBuf::from("/tmp/event.json")));
    }
}

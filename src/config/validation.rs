//! Argument validation run before any network call.

use super::types::HandlerConfig;
use crate::error::ConfigError;

impl HandlerConfig {
    /// Reject the run when credentials or the target team are missing.
    pub fn check_args(&self) -> Result<(), ConfigError> {
        if self.auth_token.is_empty() {
            return Err(ConfigError::MissingAuthToken);
        }
        if self.team.is_empty() {
            return Err(ConfigError::MissingTeam);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;

    #[test]
    fn check_args_requires_token_then_team() {
        let mut config = HandlerConfig::default();
        assert!(matches!(
            config.check_args(),
            Err(ConfigError::MissingAuthToken)
        ));

        config.auth_token = SecretString::new("Testing".to_string());
        assert!(matches!(config.check_args(), Err(ConfigError::MissingTeam)));

        config.team = "Testing".to_string();
        assert!(config.check_args().is_ok());
    }

    #[test]
    fn check_args_team_alone_is_not_enough() {
        let config = HandlerConfig {
            team: "ops".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.check_args(),
            Err(ConfigError::MissingAuthToken)
        ));
    }
}

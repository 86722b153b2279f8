//! Configuration validation with range checks.

use std::net::SocketAddr;

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        // Empty, blank and duplicate names are rejected by the class table itself.
        self.class_names()?;

        if self.classes.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "classes.top_k must be > 0".into(),
            ));
        }
        if self.model.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.endpoint must not be empty".into(),
            ));
        }
        if self.model.project.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.project must not be empty".into(),
            ));
        }
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.name must not be empty".into(),
            ));
        }
        if self
            .model
            .version
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "model.version must not be empty when set".into(),
            ));
        }
        if self.model.output_field.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.output_field must not be empty".into(),
            ));
        }
        if self.limits.max_upload_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_upload_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        config.classes.top_k = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_validate_rejects_duplicate_class_names() {
        let mut config = Config::default();
        config.classes.names = vec!["Apple".into(), "Pear".into(), "Apple".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Apple"));
    }

    #[test]
    fn test_validate_rejects_empty_output_field() {
        let mut config = Config::default();
        config.model.output_field = "  ".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output_field"));
    }

    #[test]
    fn test_validate_rejects_blank_version() {
        let mut config = Config::default();
        config.model.version = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("model.version"));

        config.model.version = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.request_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = Config::default();
        config.server.bind = "localhost".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.bind"));
    }
}

use crate::config::types::{Config, DigestConfig, LlmConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_llm_config(&config.llm)?;
    validate_digest_config(&config.digest)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates LLM backend configuration
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "llm timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates web digest configuration
fn validate_digest_config(config: &DigestConfig) -> Result<(), ConfigError> {
    if config.max_content_chars < 1 {
        return Err(ConfigError::Validation(
            "max-content-chars must be >= 1".to_string(),
        ));
    }

    if config.single_page_max_content_chars < 1 {
        return Err(ConfigError::Validation(
            "single-page-max-content-chars must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid server bind '{}': {}", config.bind, e))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = Config::default();
        config.llm.model = "  ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = Config::default();
        config.llm.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.llm.base_url = "file:///tmp/api".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_caps_rejected() {
        let mut config = Config::default();
        config.digest.max_content_chars = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.digest.single_page_max_content_chars = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_bind_rejected() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(validate(&config).is_err());
    }
}

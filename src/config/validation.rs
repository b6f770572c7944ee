use crate::config::types::{
    Config, CrawlerConfig, FetchConfig, FilterConfig, OutputConfig, ServerConfig,
};
use crate::url::parse_seed;
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seed(&config.seed)?;
    validate_crawler_config(&config.crawler)?;
    validate_fetch_config(&config.fetch)?;
    validate_filter_config(&config.filter)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// The seed must be an absolute HTTP(S) URL
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    parse_seed(seed)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > 1_000_000 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and 1000000, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.backoff_multiplier < 1 {
        return Err(ConfigError::Validation(format!(
            "backoff_multiplier must be >= 1, got {}",
            config.backoff_multiplier
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    if config.max_href_length < 1 {
        return Err(ConfigError::Validation(
            "max_href_length must be >= 1".to_string(),
        ));
    }

    // An empty pattern would match every URL
    if config.allow.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "allow patterns cannot be empty strings".to_string(),
        ));
    }

    if config.deny.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "deny patterns cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.artifact_path.is_empty() {
        return Err(ConfigError::Validation(
            "artifact_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.bind, e))
    })?;

    if config.viewer_path.is_empty() {
        return Err(ConfigError::Validation(
            "viewer_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

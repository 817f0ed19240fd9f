use crate::certificate::FieldLocator;
use crate::config::types::{BatchConfig, Config, PortalConfig, RetryConfig};
use crate::ConfigError;
use url::Url;

const MAX_ATTEMPTS_LIMIT: u32 = 20;
const MAX_BACKOFF_MS: u64 = 60_000;
const MAX_WORKERS_LIMIT: usize = 512;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_retry_config(&config.retry)?;
    validate_batch_config(&config.batch)?;
    Ok(())
}

/// Validates portal configuration
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.field_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "field_prefix cannot be empty".to_string(),
        ));
    }

    // Every derived selector must parse
    FieldLocator::new(&config.field_prefix)?;

    if config.request_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be >= 1".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > MAX_ATTEMPTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS_LIMIT, config.max_attempts
        )));
    }

    if config.backoff_ms > MAX_BACKOFF_MS {
        return Err(ConfigError::Validation(format!(
            "backoff_ms must be <= {}ms, got {}ms",
            MAX_BACKOFF_MS, config.backoff_ms
        )));
    }

    Ok(())
}

/// Validates batch configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_workers must be <= {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    Ok(())
}

use crate::config::types::{BackendKind, Config, DatabaseConfig, ScraperConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_database_config(&config.database)?;
    Ok(())
}

/// Validates crawl behavior settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // A short delay is legal but impolite toward the target server.
    if config.delay_ms < 500 {
        tracing::warn!(
            "delay-ms is {}ms; values below 500ms are discouraged",
            config.delay_ms
        );
    }

    Ok(())
}

/// Validates document store settings
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.backend == BackendKind::Sqlite && config.sqlite_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sqlite-path cannot be empty when the sqlite backend is selected".to_string(),
        ));
    }

    Ok(())
}

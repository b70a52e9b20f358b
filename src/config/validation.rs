//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{FiveMGolfError, Result};
use super::Settings;

/// Upper bound for session token lifetime (30 days)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 30;
/// Upper bound for the bank lookback window (31 days)
pub const MAX_LOOKBACK_HOURS: i64 = 24 * 31;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_currency_config(&settings.currency)?;
    validate_fees_config(&settings.fees)?;
    validate_sync_config(&settings.sync)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    if settings.features.deposit_sync {
        validate_bank_config(&settings.bank)?;
    }

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(FiveMGolfError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(FiveMGolfError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(FiveMGolfError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(FiveMGolfError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(FiveMGolfError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(FiveMGolfError::Config(
            "Redis URL is required".to_string()
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 16 {
        return Err(FiveMGolfError::Config(
            "JWT secret must be at least 16 characters".to_string()
        ));
    }

    if config.token_ttl_hours <= 0 || config.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
        return Err(FiveMGolfError::Config(format!(
            "Token TTL must be between 1 and {} hours",
            MAX_TOKEN_TTL_HOURS
        )));
    }

    if config.cron_secret.is_empty() {
        return Err(FiveMGolfError::Config(
            "Cron secret is required".to_string()
        ));
    }

    if config.login_attempts_per_minute == 0 {
        return Err(FiveMGolfError::Config(
            "Login attempts per minute must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate banking API configuration
fn validate_bank_config(config: &super::BankConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(FiveMGolfError::Config(
            "Bank API URL is required".to_string()
        ));
    }
    url::Url::parse(&config.api_url)?;

    if config.account_number.is_empty() {
        return Err(FiveMGolfError::Config(
            "Bank account number is required when deposit sync is enabled".to_string()
        ));
    }

    if config.lookback_hours <= 0 || config.lookback_hours > MAX_LOOKBACK_HOURS {
        return Err(FiveMGolfError::Config(format!(
            "Bank lookback window must be between 1 and {} hours",
            MAX_LOOKBACK_HOURS
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(FiveMGolfError::Config(
            "Bank timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_currency_config(config: &super::CurrencyConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(FiveMGolfError::Config(
            "Currency API URL is required".to_string()
        ));
    }
    url::Url::parse(&config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(FiveMGolfError::Config(
            "Currency timeout must be greater than 0".to_string()
        ));
    }

    if config.requests_per_minute == 0 {
        return Err(FiveMGolfError::Config(
            "Currency requests per minute must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_fees_config(config: &super::FeesConfig) -> Result<()> {
    if config.group_discount_percent > 100 {
        return Err(FiveMGolfError::Config(
            format!("Group discount cannot exceed 100%, got {}", config.group_discount_percent)
        ));
    }

    Ok(())
}

fn validate_sync_config(config: &super::SyncConfig) -> Result<()> {
    for (name, environment) in &config.environments {
        if environment.database_url.is_empty() {
            return Err(FiveMGolfError::Config(
                format!("Sync environment '{}' has no database URL", name)
            ));
        }
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(FiveMGolfError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(FiveMGolfError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(FiveMGolfError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(FiveMGolfError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(FiveMGolfError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub bank: BankConfig,
    pub currency: CurrencyConfig,
    pub fees: FeesConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Session token and cron authentication
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cron_secret: String,
    pub login_attempts_per_minute: u32,
}

/// Banking API used by deposit ingestion
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BankConfig {
    pub api_url: String,
    pub api_key: String,
    pub account_number: String,
    pub lookback_hours: i64,
    pub timeout_seconds: u64,
}

/// Exchange-rate API used by the currency proxy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurrencyConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub requests_per_minute: u32,
}

/// Unit rates and group discount for quotations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeesConfig {
    pub golf_rate: u64,
    pub accommodation_rate: u64,
    pub rental_car_rate: u64,
    pub flight_rate: u64,
    pub group_discount_threshold: u32,
    pub group_discount_percent: u64,
}

/// Named environments for the sync CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

/// A single sync environment (one hosted project)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    pub database_url: String,
    #[serde(default = "default_environment_connections")]
    pub max_connections: u32,
}

fn default_environment_connections() -> u32 {
    5
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
    pub overrides_dir: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub file_prefix: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub deposit_sync: bool,
    pub currency_cache: bool,
    pub test_endpoint: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;
        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FIVEMGOLF")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("i18n.supported_languages")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::FiveMGolfError> {
        super::validation::validate_settings(self)
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for FeesConfig {
    fn default() -> Self {
        Self {
            golf_rate: 10_000,
            accommodation_rate: 10_000,
            rental_car_rate: 10_000,
            flight_rate: 10_000,
            group_discount_threshold: 8,
            group_discount_percent: 30,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_origins: vec![],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/fivemgolf".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "fivemgolf:".to_string(),
                ttl_seconds: 3600,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production-please".to_string(),
                token_ttl_hours: 12,
                cron_secret: "change-me-cron-secret".to_string(),
                login_attempts_per_minute: 10,
            },
            bank: BankConfig {
                api_url: "https://openapi.bank.example.com/v1".to_string(),
                api_key: String::new(),
                account_number: String::new(),
                lookback_hours: 24,
                timeout_seconds: 10,
            },
            currency: CurrencyConfig {
                api_url: "https://api.exchangerate.host".to_string(),
                api_key: None,
                timeout_seconds: 5,
                cache_ttl_seconds: 600,
                requests_per_minute: 60,
            },
            fees: FeesConfig::default(),
            sync: SyncConfig::default(),
            i18n: I18nConfig {
                default_language: "ko".to_string(),
                supported_languages: vec!["ko".to_string(), "en".to_string(), "ja".to_string()],
                translations_dir: "translations".to_string(),
                overrides_dir: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: None,
                file_prefix: "fivemgolf.log".to_string(),
            },
            features: FeaturesConfig {
                deposit_sync: true,
                currency_cache: true,
                test_endpoint: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_fee_rates() {
        let settings = Settings::default();
        assert_eq!(settings.fees.golf_rate, 10_000);
        assert_eq!(settings.fees.group_discount_threshold, 8);
        assert_eq!(settings.fees.group_discount_percent, 30);
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        std::env::set_var("FIVEMGOLF__SERVER__PORT", "9191");
        std::env::set_var("FIVEMGOLF__BANK__LOOKBACK_HOURS", "48");
        let settings = Settings::new().expect("settings load");
        std::env::remove_var("FIVEMGOLF__SERVER__PORT");
        std::env::remove_var("FIVEMGOLF__BANK__LOOKBACK_HOURS");

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.bank.lookback_hours, 48);
        assert_eq!(settings.i18n.default_language, "ko");
    }
}

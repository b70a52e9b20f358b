//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from config files and environment variables.

pub mod settings;
pub mod validation;

pub use settings::{
    Settings, ServerConfig, DatabaseConfig, RedisConfig, AuthConfig, BankConfig, CurrencyConfig,
    FeesConfig, SyncConfig, EnvironmentConfig, I18nConfig, LoggingConfig, FeaturesConfig,
};

//! Error handling for 5MGOLF
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the 5MGOLF backend
#[derive(Error, Debug)]
pub enum FiveMGolfError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Bank API error: {0}")]
    Bank(#[from] BankError),

    #[error("Currency API error: {0}")]
    Currency(#[from] CurrencyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Banking API specific errors
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Bank API request failed: {0}")]
    RequestFailed(String),

    #[error("Bank API timeout")]
    Timeout,

    #[error("Invalid bank API response: {0}")]
    InvalidResponse(String),

    #[error("Bank API unavailable")]
    ServiceUnavailable,
}

/// Exchange-rate API specific errors
#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("Currency API request failed: {0}")]
    RequestFailed(String),

    #[error("Currency API timeout")]
    Timeout,

    #[error("Invalid currency API response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported currency code: {0}")]
    UnsupportedCurrency(String),
}

/// Result type alias for 5MGOLF operations
pub type Result<T> = std::result::Result<T, FiveMGolfError>;

/// Result type alias for bank API operations
pub type BankResult<T> = std::result::Result<T, BankError>;

/// Result type alias for currency API operations
pub type CurrencyResult<T> = std::result::Result<T, CurrencyError>;

impl FiveMGolfError {
    /// Shorthand for a missing entity
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        FiveMGolfError::NotFound { kind, id: id.into() }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            FiveMGolfError::Database(_) => false,
            FiveMGolfError::Migration(_) => false,
            FiveMGolfError::Bank(_) => true,
            FiveMGolfError::Currency(_) => true,
            FiveMGolfError::Config(_) => false,
            FiveMGolfError::PermissionDenied(_) => false,
            FiveMGolfError::NotFound { .. } => false,
            FiveMGolfError::AlreadyExists(_) => false,
            FiveMGolfError::InvalidStateTransition { .. } => false,
            FiveMGolfError::Redis(_) => true,
            FiveMGolfError::Http(_) => true,
            FiveMGolfError::Serialization(_) => false,
            FiveMGolfError::Io(_) => true,
            FiveMGolfError::UrlParse(_) => false,
            FiveMGolfError::Token(_) => false,
            FiveMGolfError::PasswordHash(_) => false,
            FiveMGolfError::Authentication(_) => false,
            FiveMGolfError::RateLimitExceeded => true,
            FiveMGolfError::InvalidInput(_) => false,
            FiveMGolfError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FiveMGolfError::Database(_) => ErrorSeverity::Critical,
            FiveMGolfError::Migration(_) => ErrorSeverity::Critical,
            FiveMGolfError::Config(_) => ErrorSeverity::Critical,
            FiveMGolfError::PermissionDenied(_) => ErrorSeverity::Warning,
            FiveMGolfError::Authentication(_) => ErrorSeverity::Warning,
            FiveMGolfError::Token(_) => ErrorSeverity::Warning,
            FiveMGolfError::RateLimitExceeded => ErrorSeverity::Warning,
            FiveMGolfError::InvalidInput(_) => ErrorSeverity::Info,
            FiveMGolfError::NotFound { .. } => ErrorSeverity::Info,
            FiveMGolfError::AlreadyExists(_) => ErrorSeverity::Info,
            FiveMGolfError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            FiveMGolfError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            FiveMGolfError::Authentication(_) | FiveMGolfError::Token(_) => StatusCode::UNAUTHORIZED,
            FiveMGolfError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            FiveMGolfError::NotFound { .. } => StatusCode::NOT_FOUND,
            FiveMGolfError::AlreadyExists(_) => StatusCode::CONFLICT,
            FiveMGolfError::InvalidStateTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FiveMGolfError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            FiveMGolfError::Bank(_) | FiveMGolfError::Currency(CurrencyError::RequestFailed(_))
            | FiveMGolfError::Currency(CurrencyError::Timeout)
            | FiveMGolfError::Currency(CurrencyError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            FiveMGolfError::Currency(CurrencyError::UnsupportedCurrency(_)) => StatusCode::BAD_REQUEST,
            FiveMGolfError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            FiveMGolfError::InvalidInput(_) => "invalid_input",
            FiveMGolfError::Authentication(_) | FiveMGolfError::Token(_) => "unauthorized",
            FiveMGolfError::PermissionDenied(_) => "forbidden",
            FiveMGolfError::NotFound { .. } => "not_found",
            FiveMGolfError::AlreadyExists(_) => "conflict",
            FiveMGolfError::InvalidStateTransition { .. } => "invalid_state",
            FiveMGolfError::RateLimitExceeded => "rate_limited",
            FiveMGolfError::Bank(_) => "bank_api_error",
            FiveMGolfError::Currency(CurrencyError::UnsupportedCurrency(_)) => "invalid_input",
            FiveMGolfError::Currency(_) => "currency_api_error",
            FiveMGolfError::ServiceUnavailable(_) => "service_unavailable",
            _ => "internal_error",
        }
    }

    /// Translation key of the generic user-facing message
    pub fn message_key(&self) -> &'static str {
        match self.error_code() {
            "invalid_input" => "errors.invalid_input",
            "unauthorized" => "errors.unauthorized",
            "forbidden" => "errors.forbidden",
            "not_found" => "errors.not_found",
            "conflict" => "errors.conflict",
            "invalid_state" => "errors.invalid_state",
            "rate_limited" => "errors.rate_limited",
            "bank_api_error" | "currency_api_error" => "errors.upstream",
            "service_unavailable" => "errors.service_unavailable",
            _ => "errors.internal",
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

//! Middleware module
//!
//! This module contains middleware for request processing

pub mod auth;
pub mod locale;
pub mod logging;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::{bearer_token, Authenticated};
pub use locale::RequestLanguage;
pub use rate_limit::KeyedLimiter;

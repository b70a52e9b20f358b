//! 5MGOLF platform backend
//!
//! Admin and booking backend for the 5MGOLF golf travel platform: quotations
//! with the group fee calculator, withdrawals, bank-fed deposits, user and
//! role management, a bundled course catalog, a cached currency-rate proxy
//! and cross-environment data sync tooling.

pub mod config;
pub mod database;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{FiveMGolfError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::create_router;
pub use i18n::I18n;
pub use services::ServiceFactory;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}

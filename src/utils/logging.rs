//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the 5MGOLF backend.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    let guard = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, &config.file_prefix);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log admin console actions with structured data
pub fn log_admin_action(actor_uid: &str, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        actor_uid = actor_uid,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log the outcome of a single sync item
pub fn log_sync_item(kind: &str, key: &str, outcome: &str) {
    debug!(kind = kind, key = key, outcome = outcome, "Sync item processed");
}

/// Log a failed sync item
pub fn log_sync_failure(kind: &str, key: &str, error: &str) {
    error!(kind = kind, key = key, error = error, "Sync item failed");
}

/// Log deposit ingestion results
pub fn log_deposit_ingest(fetched: usize, inserted: usize, duplicates: usize) {
    info!(
        fetched = fetched,
        inserted = inserted,
        duplicates = duplicates,
        "Deposit ingestion completed"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log document store operations
pub fn log_database_operation(operation: &str, collection: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            collection = collection,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            collection = collection,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}

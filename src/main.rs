//! 5MGOLF API server
//!
//! Main application entry point

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use fivemgolf::{
    config::Settings,
    create_router,
    database::{create_pool, run_migrations, DatabaseService, PoolSettings},
    middleware::rate_limit::spawn_cleanup,
    services::RedisService,
    utils::logging,
    AppState,
};

const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", fivemgolf::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolSettings::from(&settings.database)).await?;

    info!("Running database migrations...");
    run_migrations(&pool).await?;

    let database = DatabaseService::new(pool);

    // Cache is optional; rates are fetched directly without it
    let redis = if settings.features.currency_cache {
        info!("Connecting to Redis...");
        match RedisService::new(&settings.redis) {
            Ok(redis) => Some(redis),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, continuing without cache");
                None
            }
        }
    } else {
        None
    };

    info!("Initializing services...");
    let address = settings.bind_address();
    let state = AppState::build(settings, database, redis).await?;
    let _limiter_cleanup = spawn_cleanup(state.limiters(), LIMITER_CLEANUP_INTERVAL);
    let app = create_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("5MGOLF server has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

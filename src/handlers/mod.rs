//! HTTP handlers module
//!
//! Route handlers grouped by resource, and the router wiring them together
//! with the locale, logging and CORS layers.

pub mod auth;
pub mod courses;
pub mod cron;
pub mod currency;
pub mod deposits;
pub mod echo;
pub mod fees;
pub mod health;
pub mod i18n;
pub mod locations;
pub mod quotations;
pub mod response;
pub mod users;
pub mod withdrawals;

pub use response::{ApiResponse, ApiResult, ErrorInfo};

use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::middleware::{locale, logging, rate_limit};
use crate::state::AppState;

/// Empty origin list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/{uid}",
            get(users::get_user).patch(users::update_user).delete(users::delete_user),
        )
        .route(
            "/quotations",
            get(quotations::list_quotations).post(quotations::create_quotation),
        )
        .route(
            "/quotations/{id}",
            get(quotations::get_quotation)
                .put(quotations::update_quotation)
                .delete(quotations::delete_quotation),
        )
        .route("/quotations/{id}/status", patch(quotations::update_quotation_status))
        .route(
            "/withdrawals",
            get(withdrawals::list_withdrawals).post(withdrawals::create_withdrawal),
        )
        .route(
            "/withdrawals/{id}",
            get(withdrawals::get_withdrawal)
                .put(withdrawals::update_withdrawal)
                .delete(withdrawals::delete_withdrawal),
        )
        .route("/withdrawals/{id}/status", patch(withdrawals::update_withdrawal_status))
        .route("/deposits", get(deposits::list_deposits).post(deposits::create_deposit))
        .route("/deposits/{id}/status", patch(deposits::update_deposit_status))
        .route(
            "/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/locations/{id}",
            put(locations::update_location).delete(locations::delete_location),
        )
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let currency_routes = Router::new()
        .route("/api/currency-rate", get(currency::get_rate))
        .route_layer(from_fn_with_state(
            state.currency_limiter.clone(),
            rate_limit::limit_by_client,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/cron/deposit-sync", get(cron::deposit_sync).post(cron::deposit_sync))
        .route("/api/auth/login", post(auth::login))
        .route("/api/users", post(users::create_user))
        .route("/api/test", post(echo::echo))
        .route("/api/fees/calculate", post(fees::calculate))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/{id}", get(courses::get_course))
        .route("/api/i18n/{lang}", get(i18n::get_table))
        .merge(currency_routes)
        .nest("/api/admin", admin_routes())
        .layer(from_fn_with_state(state.clone(), locale::localize))
        .layer(from_fn(logging::log_requests))
        .layer(cors_layer(&state.settings.server.cors_origins))
        .with_state(state)
}

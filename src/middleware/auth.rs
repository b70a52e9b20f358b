//! Authentication middleware
//!
//! Extractors guarding the admin console endpoints with bearer session
//! tokens.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::{debug, warn};

use crate::services::auth::{AuthContext, Permission};
use crate::state::AppState;
use crate::utils::errors::FiveMGolfError;

/// Token following `Bearer ` in the `Authorization` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Caller authenticated with a valid session token
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

impl Authenticated {
    pub fn require(&self, permission: Permission) -> Result<&AuthContext, FiveMGolfError> {
        self.0.require(permission)?;
        Ok(&self.0)
    }
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = FiveMGolfError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            debug!(path = %parts.uri.path(), "Missing bearer token");
            FiveMGolfError::Authentication("Missing bearer token".to_string())
        })?;

        let context = state.services.auth_service.authenticate(token).await.map_err(|e| {
            warn!(path = %parts.uri.path(), error = %e, "Rejected session token");
            e
        })?;

        Ok(Self(context))
    }
}

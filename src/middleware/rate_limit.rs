//! Rate limiting
//!
//! Keyed token-bucket limiters used for login attempts (keyed by email) and
//! the currency proxy (keyed by client address).

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::{debug, warn};

use crate::utils::errors::{FiveMGolfError, Result};

#[derive(Clone)]
pub struct KeyedLimiter {
    name: &'static str,
    inner: Arc<DefaultKeyedRateLimiter<String>>,
}

impl std::fmt::Debug for KeyedLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedLimiter").field("name", &self.name).finish()
    }
}

impl KeyedLimiter {
    /// Allow `per_minute` requests per key; zero is treated as one
    pub fn per_minute(name: &'static str, per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            name,
            inner: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    pub fn check(&self, key: &str) -> Result<()> {
        self.inner.check_key(&key.to_string()).map_err(|_| {
            warn!(limiter = self.name, key = %key, "Rate limit exceeded");
            FiveMGolfError::RateLimitExceeded
        })
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop keys whose bucket has refilled completely
    pub fn cleanup(&self) {
        let before = self.inner.len();
        self.inner.retain_recent();
        self.inner.shrink_to_fit();
        debug!(limiter = self.name, before, after = self.inner.len(), "Rate limiter pruned");
    }
}

/// Periodically prune the given limiters until the runtime shuts down
pub fn spawn_cleanup(limiters: Vec<KeyedLimiter>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            for limiter in &limiters {
                limiter.cleanup();
            }
        }
    })
}

/// Client key for anonymous endpoints: first `X-Forwarded-For` hop, then the peer address
pub fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting requests over the limiter's quota
pub async fn limit_by_client(
    State(limiter): State<KeyedLimiter>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, FiveMGolfError> {
    limiter.check(&client_key(&request))?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = KeyedLimiter::per_minute("test", 2);
        assert!(limiter.check("a@5mgolf.com").is_ok());
        assert!(limiter.check("a@5mgolf.com").is_ok());
        assert_matches!(limiter.check("a@5mgolf.com"), Err(FiveMGolfError::RateLimitExceeded));
        assert!(limiter.check("b@5mgolf.com").is_ok());
    }

    #[test]
    fn test_client_key() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.9");

        let mut request = Request::builder().body(axum::body::Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 44], 50123))));
        assert_eq!(client_key(&request), "192.0.2.44");

        let request = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(client_key(&request), "unknown");
    }

    #[test]
    fn test_cleanup_drops_refilled_keys() {
        // one token per millisecond refills almost at once
        let limiter = KeyedLimiter::per_minute("test", 60_000);
        for key in ["a", "b", "c"] {
            limiter.check(key).unwrap();
        }
        assert_eq!(limiter.len(), 3);

        std::thread::sleep(Duration::from_millis(50));
        limiter.cleanup();
        assert!(limiter.is_empty());
    }
}

//! Redis cache service
//!
//! Thin JSON cache over Redis with a key prefix and default TTL. Used for
//! exchange-rate lookups.

use redis::{AsyncCommands, Client, RedisResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RedisConfig;
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct RedisService {
    client: Client,
    prefix: String,
    default_ttl: u64,
}

/// Cached value with the time it was stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub ttl_seconds: u64,
}

impl RedisService {
    /// Create a client; no connection is made until first use
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        Ok(Self {
            client,
            prefix: config.prefix.clone(),
            default_ttl: config.ttl_seconds,
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Set a JSON value with TTL (defaults to the configured TTL)
    pub async fn set<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> Result<()>
    where
        T: Serialize,
    {
        let mut conn = self.connection().await?;
        let serialized = serde_json::to_string(value)?;
        let full_key = self.full_key(key);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let _: () = conn.set_ex(&full_key, serialized, ttl).await?;

        debug!(key = %full_key, ttl = ttl, "Value set in Redis");
        Ok(())
    }

    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut conn = self.connection().await?;
        let full_key = self.full_key(key);

        let result: Option<String> = conn.get(&full_key).await?;
        match result {
            Some(data) => {
                debug!(key = %full_key, "Cache hit");
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => {
                debug!(key = %full_key, "Cache miss");
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let full_key = self.full_key(key);

        let deleted: i32 = conn.del(&full_key).await?;
        debug!(key = %full_key, deleted = deleted > 0, "Key deletion attempted");
        Ok(deleted > 0)
    }

    /// PING the server; connection problems are reported as unhealthy
    pub async fn health_check(&self) -> bool {
        match self.connection().await {
            Ok(mut conn) => {
                let result: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                match result {
                    Ok(response) => response == "PONG",
                    Err(e) => {
                        warn!(error = %e, "Redis health check failed");
                        false
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed() {
        let service = RedisService::new(&crate::config::Settings::default().redis).unwrap();
        assert_eq!(service.full_key("fx:JPY:KRW"), "fivemgolf:fx:JPY:KRW");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = RedisConfig {
            url: "not a url".to_string(),
            prefix: String::new(),
            ttl_seconds: 1,
        };
        assert!(RedisService::new(&config).is_err());
    }

    #[test]
    fn test_cache_entry_serialization() {
        let entry = CacheEntry {
            data: 9.12_f64,
            created_at: chrono::Utc::now(),
            ttl_seconds: 600,
        };

        let serialized = serde_json::to_string(&entry).unwrap();
        let deserialized: CacheEntry<f64> = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.ttl_seconds, 600);
    }
}

//! Exchange-rate proxy
//!
//! Looks up a single rate from the configured API
//! (`GET {api_url}/latest?base=JPY&symbols=KRW` answering
//! `{"rates": {"KRW": 9.12}}`) and caches it in Redis.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CurrencyConfig;
use crate::services::redis::RedisService;
use crate::utils::errors::{CurrencyError, CurrencyResult, FiveMGolfError, Result};
use crate::utils::logging::log_api_error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Validate and upper-case a three-letter currency code
pub fn normalize_currency_code(code: &str) -> CurrencyResult<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(CurrencyError::UnsupportedCurrency(code.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct CurrencyService {
    client: Client,
    config: CurrencyConfig,
    cache: Option<RedisService>,
}

impl CurrencyService {
    pub fn new(config: CurrencyConfig, cache: Option<RedisService>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("5MGOLF/1.0")
            .build()?;

        Ok(Self { client, config, cache })
    }

    fn cache_key(base: &str, target: &str) -> String {
        format!("fx:{}:{}", base, target)
    }

    /// Rate converting one unit of `base` into `target`
    pub async fn get_rate(&self, base: &str, target: &str) -> Result<CurrencyRate> {
        let base = normalize_currency_code(base)?;
        let target = normalize_currency_code(target)?;
        let key = Self::cache_key(&base, &target);

        if let Some(cache) = &self.cache {
            match cache.get::<CurrencyRate>(&key).await {
                Ok(Some(rate)) => return Ok(rate),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Currency cache read failed"),
            }
        }

        let rate = if base == target {
            CurrencyRate { base, target, rate: 1.0, fetched_at: Utc::now() }
        } else {
            self.fetch_rate(&base, &target).await.map_err(|e| {
                log_api_error("currency", &e.to_string(), Some(key.as_str()));
                FiveMGolfError::Currency(e)
            })?
        };

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, &rate, Some(self.config.cache_ttl_seconds)).await {
                warn!(error = %e, "Currency cache write failed");
            }
        }

        Ok(rate)
    }

    async fn fetch_rate(&self, base: &str, target: &str) -> CurrencyResult<CurrencyRate> {
        let url = format!("{}/latest", self.config.api_url.trim_end_matches('/'));
        let mut query = vec![("base", base.to_string()), ("symbols", target.to_string())];
        if let Some(key) = &self.config.api_key {
            query.push(("access_key", key.clone()));
        }

        debug!(url = %url, base = %base, target = %target, "Requesting exchange rate");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CurrencyError::Timeout
                } else {
                    CurrencyError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(CurrencyError::RequestFailed(format!("HTTP {}", response.status())));
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| CurrencyError::InvalidResponse(e.to_string()))?;

        let rate = body
            .rates
            .get(target)
            .copied()
            .ok_or_else(|| CurrencyError::InvalidResponse(format!("missing rate for {}", target)))?;

        Ok(CurrencyRate {
            base: base.to_string(),
            target: target.to_string(),
            rate,
            fetched_at: Utc::now(),
        })
    }
}

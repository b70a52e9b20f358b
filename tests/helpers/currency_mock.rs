//! Mock exchange-rate API server

use serde_json::{json, Map};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use fivemgolf::config::CurrencyConfig;

pub struct CurrencyMockServer {
    pub server: MockServer,
}

impl CurrencyMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn config(&self) -> CurrencyConfig {
        CurrencyConfig {
            api_url: self.server.uri(),
            api_key: None,
            timeout_seconds: 5,
            cache_ttl_seconds: 60,
            requests_per_minute: 60,
        }
    }

    /// Answer `base -> target` with `rate`, expecting exactly `calls` requests
    pub async fn mock_rate(&self, base: &str, target: &str, rate: f64, calls: u64) {
        let mut rates = Map::new();
        rates.insert(target.to_string(), json!(rate));

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", base))
            .and(query_param("symbols", target))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "base": base,
                "rates": rates
            })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}

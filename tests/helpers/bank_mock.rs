//! Mock banking API server
//!
//! Serves `GET /accounts/{account}/transactions` the way the bank does.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use fivemgolf::config::BankConfig;

pub const TEST_ACCOUNT: &str = "110-123-456789";
pub const TEST_BANK_KEY: &str = "test-bank-key";

pub struct BankMockServer {
    pub server: MockServer,
}

impl BankMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Bank settings pointing at this server
    pub fn config(&self) -> BankConfig {
        BankConfig {
            api_url: self.server.uri(),
            api_key: TEST_BANK_KEY.to_string(),
            account_number: TEST_ACCOUNT.to_string(),
            lookback_hours: 24,
            timeout_seconds: 5,
        }
    }

    fn transactions_path() -> String {
        format!("/accounts/{}/transactions", TEST_ACCOUNT)
    }

    pub async fn mock_transactions(&self, transactions: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(Self::transactions_path()))
            .and(header("authorization", format!("Bearer {}", TEST_BANK_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "transactions": transactions })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::transactions_path()))
            .respond_with(ResponseTemplate::new(status).set_body_string("maintenance"))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_malformed(&self) {
        Mock::given(method("GET"))
            .and(path(Self::transactions_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&self.server)
            .await;
    }
}

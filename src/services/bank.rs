//! Banking API client
//!
//! Fetches account transactions for a time window. The API answers
//! `GET {api_url}/accounts/{account}/transactions?from=..&to=..` with a JSON
//! body `{"transactions": [...]}`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BankConfig;
use crate::utils::errors::{BankError, BankResult, FiveMGolfError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    Deposit,
    Withdrawal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub transaction_code: String,
    pub direction: TransactionDirection,
    pub amount: i64,
    #[serde(default)]
    pub counterparty: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub transacted_at: DateTime<Utc>,
}

impl BankTransaction {
    /// Incoming transfer with a positive amount
    pub fn is_eligible_deposit(&self) -> bool {
        self.direction == TransactionDirection::Deposit && self.amount > 0
    }
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    transactions: Vec<BankTransaction>,
}

#[derive(Clone, Debug)]
pub struct BankClient {
    client: Client,
    config: BankConfig,
}

impl BankClient {
    pub fn new(config: BankConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("5MGOLF-DepositSync/1.0")
            .build()?;

        Ok(Self { client, config })
    }

    /// Trailing window of the configured length ending at `now`
    pub fn window_ending(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let from = chrono::TimeDelta::try_hours(self.config.lookback_hours)
            .and_then(|lookback| now.checked_sub_signed(lookback))
            .ok_or_else(|| {
                FiveMGolfError::Config(format!(
                    "Bank lookback window out of range: {} hours",
                    self.config.lookback_hours
                ))
            })?;
        Ok((from, now))
    }

    /// All transactions between `from` and `to`
    pub async fn fetch_transactions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BankTransaction>> {
        self.request_transactions(from, to)
            .await
            .map_err(FiveMGolfError::Bank)
    }

    async fn request_transactions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BankResult<Vec<BankTransaction>> {
        let url = format!(
            "{}/accounts/{}/transactions",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.account_number)
        );

        debug!(url = %url, from = %from, to = %to, "Requesting bank transactions");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[("from", from.to_rfc3339()), ("to", to.to_rfc3339())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BankError::Timeout
                } else if e.is_connect() {
                    BankError::ServiceUnavailable
                } else {
                    BankError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BankError::RequestFailed(format!("HTTP {}: {}", status, error_text)));
        }

        let body: TransactionsResponse = response
            .json()
            .await
            .map_err(|e| BankError::InvalidResponse(e.to_string()))?;

        debug!(count = body.transactions.len(), "Bank transactions received");
        Ok(body.transactions)
    }
}

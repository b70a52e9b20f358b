//! Deposit model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding deposits
pub const DEPOSITS_COLLECTION: &str = "deposits";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositSource {
    BankSync,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    pub amount: u64,
    pub deposited_at: DateTime<Utc>,
    pub status: DepositStatus,
    pub depositor_name: String,
    pub memo: Option<String>,
    /// External transaction code from the bank, unique across deposits
    pub transaction_code: Option<String>,
    pub source: DepositSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    pub amount: u64,
    pub deposited_at: DateTime<Utc>,
    pub depositor_name: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDepositStatusRequest {
    pub status: DepositStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepositFilter {
    pub status: Option<DepositStatus>,
    pub source: Option<DepositSource>,
}

impl DepositFilter {
    pub fn matches(&self, deposit: &Deposit) -> bool {
        self.status.map_or(true, |status| status == deposit.status)
            && self.source.map_or(true, |source| source == deposit.source)
    }
}

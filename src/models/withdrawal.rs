//! Withdrawal model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding withdrawals
pub const WITHDRAWALS_COLLECTION: &str = "withdrawals";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    pub amount: u64,
    pub requested_on: NaiveDate,
    pub status: WithdrawalStatus,
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
    pub memo: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: u64,
    pub requested_on: NaiveDate,
    pub bank_name: String,
    pub account_holder: String,
    pub account_number: String,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWithdrawalStatusRequest {
    pub status: WithdrawalStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WithdrawalFilter {
    pub status: Option<WithdrawalStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl WithdrawalFilter {
    pub fn matches(&self, withdrawal: &Withdrawal) -> bool {
        if self.status.is_some_and(|status| status != withdrawal.status) {
            return false;
        }
        if self.from.is_some_and(|from| withdrawal.requested_on < from) {
            return false;
        }
        if self.to.is_some_and(|to| withdrawal.requested_on > to) {
            return false;
        }
        true
    }
}

//! Deposit service
//!
//! Bank ingestion plus the manual deposit operations of the admin console.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::database::repositories::deposit::bank_deposit_id;
use crate::database::DepositRepository;
use crate::models::{
    Deposit, DepositFilter, DepositRequest, DepositSource, DepositStatus,
};
use crate::services::bank::{BankClient, BankTransaction};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::generate_document_id;
use crate::utils::logging::log_deposit_ingest;

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositSyncReport {
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub fetched: usize,
    pub eligible: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

#[derive(Clone, Debug)]
pub struct DepositService {
    deposits: DepositRepository,
    bank: BankClient,
}

impl DepositService {
    pub fn new(deposits: DepositRepository, bank: BankClient) -> Self {
        Self { deposits, bank }
    }

    /// Pull the trailing window from the bank and store unseen deposits
    pub async fn sync_from_bank(&self, now: DateTime<Utc>) -> Result<DepositSyncReport> {
        let (from, to) = self.bank.window_ending(now)?;
        let transactions = self.bank.fetch_transactions(from, to).await?;

        let mut report = self.ingest(transactions, now).await?;
        report.window_start = Some(from);
        report.window_end = Some(to);

        log_deposit_ingest(report.fetched, report.inserted, report.duplicates);
        Ok(report)
    }

    /// Store eligible transactions whose code is not already present
    pub async fn ingest(
        &self,
        transactions: Vec<BankTransaction>,
        now: DateTime<Utc>,
    ) -> Result<DepositSyncReport> {
        let mut report = DepositSyncReport {
            fetched: transactions.len(),
            ..DepositSyncReport::default()
        };
        let mut seen = HashSet::new();

        for tx in transactions.into_iter().filter(BankTransaction::is_eligible_deposit) {
            report.eligible += 1;

            if !seen.insert(tx.transaction_code.clone())
                || self.deposits.exists_by_transaction_code(&tx.transaction_code).await?
            {
                debug!(transaction_code = %tx.transaction_code, "Skipping known transaction");
                report.duplicates += 1;
                continue;
            }

            let deposit = Deposit {
                id: bank_deposit_id(&tx.transaction_code),
                amount: tx.amount.unsigned_abs(),
                deposited_at: tx.transacted_at,
                status: DepositStatus::Pending,
                depositor_name: tx.counterparty,
                memo: tx.memo,
                transaction_code: Some(tx.transaction_code),
                source: DepositSource::BankSync,
                created_at: now,
                updated_at: now,
            };

            if self.deposits.insert_bank_deposit(&deposit).await? {
                report.inserted += 1;
            } else {
                report.duplicates += 1;
            }
        }

        Ok(report)
    }

    /// Record a deposit entered by an operator
    pub async fn create_manual(&self, request: DepositRequest) -> Result<Deposit> {
        if request.amount == 0 {
            return Err(FiveMGolfError::InvalidInput("Amount must be positive".to_string()));
        }
        if request.depositor_name.trim().is_empty() {
            return Err(FiveMGolfError::InvalidInput("Depositor name is required".to_string()));
        }

        let now = Utc::now();
        let deposit = Deposit {
            id: generate_document_id(),
            amount: request.amount,
            deposited_at: request.deposited_at,
            status: DepositStatus::Pending,
            depositor_name: request.depositor_name.trim().to_string(),
            memo: request.memo,
            transaction_code: None,
            source: DepositSource::Manual,
            created_at: now,
            updated_at: now,
        };

        self.deposits.save(&deposit.id, &deposit).await?;
        info!(deposit_id = %deposit.id, amount = deposit.amount, "Manual deposit recorded");
        Ok(deposit)
    }

    /// Deposits matching the filter, newest first
    pub async fn list(&self, filter: &DepositFilter) -> Result<Vec<Deposit>> {
        let mut deposits: Vec<Deposit> = self
            .deposits
            .list()
            .await?
            .into_iter()
            .filter(|deposit| filter.matches(deposit))
            .collect();
        deposits.sort_by(|a, b| b.deposited_at.cmp(&a.deposited_at));
        Ok(deposits)
    }

    pub async fn get(&self, id: &str) -> Result<Deposit> {
        self.deposits
            .find_by_id(id)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("Deposit", id))
    }

    pub async fn update_status(&self, id: &str, status: DepositStatus) -> Result<Deposit> {
        let mut deposit = self.get(id).await?;
        deposit.status = status;
        deposit.updated_at = Utc::now();
        self.deposits.save(&deposit.id, &deposit).await?;
        Ok(deposit)
    }
}

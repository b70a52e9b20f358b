//! Deposit repository queries

use serde_json::Value;

use super::DepositRepository;
use crate::models::Deposit;
use crate::utils::errors::Result;
use crate::utils::helpers::encode_document_id;

/// Document id used for a bank-sourced deposit
pub fn bank_deposit_id(transaction_code: &str) -> String {
    format!("bank-{}", encode_document_id(transaction_code))
}

impl DepositRepository {
    /// Check whether a deposit with the external transaction code is stored
    pub async fn exists_by_transaction_code(&self, transaction_code: &str) -> Result<bool> {
        let found = self
            .find_by_field("transaction_code", &Value::String(transaction_code.to_string()))
            .await?;
        Ok(!found.is_empty())
    }

    /// Insert a bank-sourced deposit unless its transaction code is taken
    pub async fn insert_bank_deposit(&self, deposit: &Deposit) -> Result<bool> {
        self.insert_new(&deposit.id, deposit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_deposit_id() {
        assert_eq!(bank_deposit_id("20240601/0001"), "bank-20240601%2F0001");
        assert_ne!(bank_deposit_id("A/B"), bank_deposit_id("A_B"));
        assert_ne!(bank_deposit_id("A B"), bank_deposit_id("A_B"));
    }
}

//! Withdrawal service

use chrono::Utc;
use tracing::info;

use crate::database::WithdrawalRepository;
use crate::models::{Withdrawal, WithdrawalFilter, WithdrawalRequest, WithdrawalStatus};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::generate_document_id;

fn validate_request(request: &WithdrawalRequest) -> Result<()> {
    if request.amount == 0 {
        return Err(FiveMGolfError::InvalidInput("Amount must be positive".to_string()));
    }
    for (field, value) in [
        ("bank_name", &request.bank_name),
        ("account_holder", &request.account_holder),
        ("account_number", &request.account_number),
    ] {
        if value.trim().is_empty() {
            return Err(FiveMGolfError::InvalidInput(format!("{} is required", field)));
        }
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct WithdrawalService {
    withdrawals: WithdrawalRepository,
}

impl WithdrawalService {
    pub fn new(withdrawals: WithdrawalRepository) -> Self {
        Self { withdrawals }
    }

    pub async fn create(&self, request: WithdrawalRequest, created_by: &str) -> Result<Withdrawal> {
        validate_request(&request)?;

        let now = Utc::now();
        let withdrawal = Withdrawal {
            id: generate_document_id(),
            amount: request.amount,
            requested_on: request.requested_on,
            status: WithdrawalStatus::Pending,
            bank_name: request.bank_name.trim().to_string(),
            account_holder: request.account_holder.trim().to_string(),
            account_number: request.account_number.trim().to_string(),
            memo: request.memo,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.withdrawals.save(&withdrawal.id, &withdrawal).await?;
        info!(withdrawal_id = %withdrawal.id, amount = withdrawal.amount, "Withdrawal requested");
        Ok(withdrawal)
    }

    pub async fn get(&self, id: &str) -> Result<Withdrawal> {
        self.withdrawals
            .find_by_id(id)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("Withdrawal", id))
    }

    pub async fn update(&self, id: &str, request: WithdrawalRequest) -> Result<Withdrawal> {
        validate_request(&request)?;

        let mut withdrawal = self.get(id).await?;
        withdrawal.amount = request.amount;
        withdrawal.requested_on = request.requested_on;
        withdrawal.bank_name = request.bank_name.trim().to_string();
        withdrawal.account_holder = request.account_holder.trim().to_string();
        withdrawal.account_number = request.account_number.trim().to_string();
        withdrawal.memo = request.memo;
        withdrawal.updated_at = Utc::now();

        self.withdrawals.save(&withdrawal.id, &withdrawal).await?;
        Ok(withdrawal)
    }

    pub async fn set_status(&self, id: &str, status: WithdrawalStatus) -> Result<Withdrawal> {
        let mut withdrawal = self.get(id).await?;
        withdrawal.status = status;
        withdrawal.updated_at = Utc::now();
        self.withdrawals.save(&withdrawal.id, &withdrawal).await?;
        Ok(withdrawal)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.withdrawals.delete(id).await? {
            return Err(FiveMGolfError::not_found("Withdrawal", id));
        }
        Ok(())
    }

    /// Withdrawals matching the filter, latest request date first
    pub async fn list(&self, filter: &WithdrawalFilter) -> Result<Vec<Withdrawal>> {
        let mut withdrawals: Vec<Withdrawal> = self
            .withdrawals
            .list()
            .await?
            .into_iter()
            .filter(|w| filter.matches(w))
            .collect();
        withdrawals.sort_by(|a, b| {
            b.requested_on
                .cmp(&a.requested_on)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(withdrawals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseService;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn request(amount: u64, day: u32) -> WithdrawalRequest {
        WithdrawalRequest {
            amount,
            requested_on: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            bank_name: "KB".to_string(),
            account_holder: "Han".to_string(),
            account_number: "123-45-6789".to_string(),
            memo: None,
        }
    }

    fn service() -> WithdrawalService {
        WithdrawalService::new(DatabaseService::in_memory().repos.withdrawals)
    }

    #[tokio::test]
    async fn test_required_fields() {
        let service = service();
        assert_matches!(service.create(request(0, 1), "u").await, Err(FiveMGolfError::InvalidInput(_)));

        let mut blank = request(100, 1);
        blank.account_number = " ".to_string();
        assert_matches!(service.create(blank, "u").await, Err(FiveMGolfError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_status_and_date_filter() {
        let service = service();
        let early = service.create(request(100, 1), "u").await.unwrap();
        let late = service.create(request(200, 20), "u").await.unwrap();
        service.set_status(&late.id, WithdrawalStatus::Approved).await.unwrap();

        let all = service.list(&WithdrawalFilter::default()).await.unwrap();
        assert_eq!(all[0].id, late.id);

        let june_first_week = service
            .list(&WithdrawalFilter {
                status: None,
                from: NaiveDate::from_ymd_opt(2024, 6, 1),
                to: NaiveDate::from_ymd_opt(2024, 6, 7),
            })
            .await
            .unwrap();
        assert_eq!(june_first_week.len(), 1);
        assert_eq!(june_first_week[0].id, early.id);

        let approved = service
            .list(&WithdrawalFilter { status: Some(WithdrawalStatus::Approved), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let created = service.create(request(100, 1), "u").await.unwrap();
        let updated = service.update(&created.id, request(150, 2)).await.unwrap();
        assert_eq!(updated.amount, 150);

        service.delete(&created.id).await.unwrap();
        assert_matches!(service.get(&created.id).await, Err(FiveMGolfError::NotFound { .. }));
    }
}

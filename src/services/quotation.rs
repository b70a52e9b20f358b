//! Quotation service
//!
//! Quotations are saved as drafts, recomputing fees on every save. Details
//! can only change while the quotation is a draft.

use chrono::Utc;
use tracing::info;

use crate::database::QuotationRepository;
use crate::models::{Quotation, QuotationDraft, QuotationFilter, QuotationStatus};
use crate::services::fees::FeeCalculator;
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::generate_document_id;

#[derive(Clone, Debug)]
pub struct QuotationService {
    quotations: QuotationRepository,
    fees: FeeCalculator,
}

fn validate_draft(draft: &QuotationDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(FiveMGolfError::InvalidInput("Title is required".to_string()));
    }
    if draft.customer_name.trim().is_empty() {
        return Err(FiveMGolfError::InvalidInput("Customer name is required".to_string()));
    }
    Ok(())
}

impl QuotationService {
    pub fn new(quotations: QuotationRepository, fees: FeeCalculator) -> Self {
        Self { quotations, fees }
    }

    pub async fn create(&self, draft: QuotationDraft, created_by: &str) -> Result<Quotation> {
        validate_draft(&draft)?;

        let now = Utc::now();
        let quotation = Quotation {
            id: generate_document_id(),
            fees: self.fees.calculate(&draft.fee_input()),
            title: draft.title.trim().to_string(),
            customer_name: draft.customer_name.trim().to_string(),
            contact: draft.contact,
            status: QuotationStatus::Draft,
            people: draft.people,
            golf_schedules: draft.golf_schedules,
            accommodation_schedules: draft.accommodation_schedules,
            rental_car_schedules: draft.rental_car_schedules,
            flight_schedules: draft.flight_schedules,
            payment: draft.payment,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.quotations.save(&quotation.id, &quotation).await?;
        info!(quotation_id = %quotation.id, total = quotation.fees.total, "Quotation created");
        Ok(quotation)
    }

    pub async fn get(&self, id: &str) -> Result<Quotation> {
        self.quotations
            .find_by_id(id)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("Quotation", id))
    }

    /// Replace the details of a draft quotation
    pub async fn update(&self, id: &str, draft: QuotationDraft) -> Result<Quotation> {
        validate_draft(&draft)?;

        let mut quotation = self.get(id).await?;
        if quotation.status != QuotationStatus::Draft {
            return Err(FiveMGolfError::InvalidStateTransition {
                from: quotation.status.to_string(),
                to: "edit".to_string(),
            });
        }

        quotation.fees = self.fees.calculate(&draft.fee_input());
        quotation.title = draft.title.trim().to_string();
        quotation.customer_name = draft.customer_name.trim().to_string();
        quotation.contact = draft.contact;
        quotation.people = draft.people;
        quotation.golf_schedules = draft.golf_schedules;
        quotation.accommodation_schedules = draft.accommodation_schedules;
        quotation.rental_car_schedules = draft.rental_car_schedules;
        quotation.flight_schedules = draft.flight_schedules;
        quotation.payment = draft.payment;
        quotation.updated_at = Utc::now();

        self.quotations.save(&quotation.id, &quotation).await?;
        Ok(quotation)
    }

    /// Toggle between draft and completed
    pub async fn set_status(&self, id: &str, status: QuotationStatus) -> Result<Quotation> {
        let mut quotation = self.get(id).await?;
        if quotation.status == status {
            return Ok(quotation);
        }

        quotation.status = status;
        quotation.updated_at = Utc::now();
        self.quotations.save(&quotation.id, &quotation).await?;
        Ok(quotation)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.quotations.delete(id).await? {
            return Err(FiveMGolfError::not_found("Quotation", id));
        }
        Ok(())
    }

    /// Quotations matching the filter, most recently updated first
    pub async fn list(&self, filter: &QuotationFilter) -> Result<Vec<Quotation>> {
        let mut quotations: Vec<Quotation> = self
            .quotations
            .list()
            .await?
            .into_iter()
            .filter(|q| filter.matches(q))
            .collect();
        quotations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(quotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseService;
    use crate::models::{AccommodationSchedule, GolfSchedule};
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn service() -> QuotationService {
        QuotationService::new(DatabaseService::in_memory().repos.quotations, FeeCalculator::default())
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
    }

    fn draft(people: u32) -> QuotationDraft {
        QuotationDraft {
            title: "Kyushu autumn trip".to_string(),
            customer_name: "Choi".to_string(),
            contact: None,
            people,
            golf_schedules: vec![
                GolfSchedule { date: date(1), course_name: "Phoenix".to_string(), tee_time: None, note: None },
                GolfSchedule { date: date(2), course_name: "Aso".to_string(), tee_time: None, note: None },
            ],
            accommodation_schedules: vec![AccommodationSchedule {
                hotel_name: "Sheraton".to_string(),
                check_in: date(1),
                check_out: date(3),
                note: None,
            }],
            rental_car_schedules: vec![],
            flight_schedules: vec![],
            payment: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_create_computes_fees() {
        let service = service();
        let quotation = service.create(draft(8), "admin-1").await.unwrap();
        assert_eq!(quotation.status, QuotationStatus::Draft);
        assert_eq!(quotation.fees.golf, 112_000);
        assert_eq!(quotation.fees.total, 122_000);
        assert_eq!(quotation.created_by, "admin-1");
    }

    #[tokio::test]
    async fn test_completed_quotation_is_read_only() {
        let service = service();
        let quotation = service.create(draft(4), "admin-1").await.unwrap();

        let updated = service.update(&quotation.id, draft(10)).await.unwrap();
        assert_eq!(updated.people, 10);

        service.set_status(&quotation.id, QuotationStatus::Completed).await.unwrap();
        assert_matches!(
            service.update(&quotation.id, draft(2)).await,
            Err(FiveMGolfError::InvalidStateTransition { .. })
        );

        service.set_status(&quotation.id, QuotationStatus::Draft).await.unwrap();
        assert!(service.update(&quotation.id, draft(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let service = service();
        let first = service.create(draft(4), "a").await.unwrap();
        let second = service.create(draft(4), "a").await.unwrap();
        service.set_status(&second.id, QuotationStatus::Completed).await.unwrap();

        let drafts = service
            .list(&QuotationFilter { status: Some(QuotationStatus::Draft), search: None })
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, first.id);

        service.delete(&first.id).await.unwrap();
        assert_matches!(service.delete(&first.id).await, Err(FiveMGolfError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_title_required() {
        let mut bad = draft(4);
        bad.title = "  ".to_string();
        assert_matches!(service().create(bad, "a").await, Err(FiveMGolfError::InvalidInput(_)));
    }
}

//! Quotation model
//!
//! A quotation bundles golf, accommodation, rental-car and flight schedules
//! into a cost proposal for a customer group.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::services::fees::{FeeBreakdown, FeeInput};

/// Collection holding quotations
pub const QUOTATIONS_COLLECTION: &str = "quotations";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Completed,
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotationStatus::Draft => write!(f, "draft"),
            QuotationStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GolfSchedule {
    pub date: NaiveDate,
    pub course_name: String,
    pub tee_time: Option<String>,
    pub note: Option<String>,
}

/// One row is one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationSchedule {
    pub hotel_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub note: Option<String>,
}

/// One row is one car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalCarSchedule {
    pub car_type: String,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSchedule {
    pub date: NaiveDate,
    pub flight_number: String,
    pub departure: String,
    pub arrival: String,
    pub passengers: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: Option<String>,
    pub deposit_amount: Option<u64>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: String,
    pub title: String,
    pub customer_name: String,
    pub contact: Option<String>,
    pub status: QuotationStatus,
    pub people: u32,
    #[serde(default)]
    pub golf_schedules: Vec<GolfSchedule>,
    #[serde(default)]
    pub accommodation_schedules: Vec<AccommodationSchedule>,
    #[serde(default)]
    pub rental_car_schedules: Vec<RentalCarSchedule>,
    #[serde(default)]
    pub flight_schedules: Vec<FlightSchedule>,
    #[serde(default)]
    pub payment: PaymentInfo,
    pub fees: FeeBreakdown,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable part of a quotation, submitted by the admin console form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationDraft {
    pub title: String,
    pub customer_name: String,
    pub contact: Option<String>,
    pub people: u32,
    #[serde(default)]
    pub golf_schedules: Vec<GolfSchedule>,
    #[serde(default)]
    pub accommodation_schedules: Vec<AccommodationSchedule>,
    #[serde(default)]
    pub rental_car_schedules: Vec<RentalCarSchedule>,
    #[serde(default)]
    pub flight_schedules: Vec<FlightSchedule>,
    #[serde(default)]
    pub payment: PaymentInfo,
}

/// Schedule row count, saturating like the fee arithmetic
fn row_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl QuotationDraft {
    pub fn fee_input(&self) -> FeeInput {
        FeeInput {
            people: self.people,
            golf_rows: row_count(self.golf_schedules.len()),
            accommodation_rows: row_count(self.accommodation_schedules.len()),
            rental_car_rows: row_count(self.rental_car_schedules.len()),
            flight_passengers: self.flight_schedules.iter().map(|f| f.passengers).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuotationStatusRequest {
    pub status: QuotationStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationFilter {
    pub status: Option<QuotationStatus>,
    pub search: Option<String>,
}

impl QuotationFilter {
    pub fn matches(&self, quotation: &Quotation) -> bool {
        if let Some(status) = self.status {
            if quotation.status != status {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return quotation.title.to_lowercase().contains(&needle)
                || quotation.customer_name.to_lowercase().contains(&needle);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_count_saturates() {
        assert_eq!(row_count(3), 3);
        assert_eq!(row_count(u32::MAX as usize), u32::MAX);
        if let Some(too_many) = (u32::MAX as usize).checked_add(1) {
            assert_eq!(row_count(too_many), u32::MAX);
        }
    }

    #[test]
    fn test_fee_input_counts_rows() {
        let draft: QuotationDraft = serde_json::from_value(json!({
            "title": "Kyushu",
            "customer_name": "Kim",
            "contact": null,
            "people": 4,
            "accommodation_schedules": [
                {"hotel_name": "Hakata", "check_in": "2024-06-01", "check_out": "2024-06-03", "note": null},
                {"hotel_name": "Hakata", "check_in": "2024-06-01", "check_out": "2024-06-03", "note": null}
            ],
            "flight_schedules": [
                {"date": "2024-06-01", "flight_number": "KE787", "departure": "ICN", "arrival": "FUK", "passengers": 4}
            ]
        }))
        .unwrap();

        let input = draft.fee_input();
        assert_eq!(input.people, 4);
        assert_eq!(input.golf_rows, 0);
        assert_eq!(input.accommodation_rows, 2);
        assert_eq!(input.flight_passengers, vec![4]);
    }
}

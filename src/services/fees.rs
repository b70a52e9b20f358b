//! Quotation fee calculation
//!
//! Pure integer arithmetic over schedule row counts. Only the golf fee is
//! discounted, and only for groups at or above the configured size.

use serde::{Deserialize, Serialize};

use crate::config::FeesConfig;

/// Row counts a fee is computed from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInput {
    pub people: u32,
    #[serde(default)]
    pub golf_rows: u32,
    /// One row per room
    #[serde(default)]
    pub accommodation_rows: u32,
    /// One row per car
    #[serde(default)]
    pub rental_car_rows: u32,
    /// Passenger count of each flight row
    #[serde(default)]
    pub flight_passengers: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub golf_undiscounted: u64,
    pub golf_discount: u64,
    pub golf: u64,
    pub accommodation: u64,
    pub rental_car: u64,
    pub flight: u64,
    pub total: u64,
}

#[derive(Debug, Clone)]
pub struct FeeCalculator {
    rates: FeesConfig,
}

impl Default for FeeCalculator {
    fn default() -> Self {
        Self::new(FeesConfig::default())
    }
}

impl FeeCalculator {
    pub fn new(rates: FeesConfig) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &FeesConfig {
        &self.rates
    }

    /// Whether the group discount applies to `people`
    pub fn discount_applies(&self, people: u32) -> bool {
        people >= self.rates.group_discount_threshold
    }

    pub fn calculate(&self, input: &FeeInput) -> FeeBreakdown {
        let rates = &self.rates;

        let golf_undiscounted = u64::from(input.people)
            .saturating_mul(u64::from(input.golf_rows))
            .saturating_mul(rates.golf_rate);

        let golf = if self.discount_applies(input.people) {
            let keep = 100u64.saturating_sub(rates.group_discount_percent);
            golf_undiscounted.saturating_mul(keep) / 100
        } else {
            golf_undiscounted
        };

        let accommodation = u64::from(input.accommodation_rows).saturating_mul(rates.accommodation_rate);
        let rental_car = u64::from(input.rental_car_rows).saturating_mul(rates.rental_car_rate);

        let passengers: u64 = input.flight_passengers.iter().map(|p| u64::from(*p)).sum();
        let flight = passengers.saturating_mul(rates.flight_rate);

        let total = golf
            .saturating_add(accommodation)
            .saturating_add(rental_car)
            .saturating_add(flight);

        FeeBreakdown {
            golf_undiscounted,
            golf_discount: golf_undiscounted - golf,
            golf,
            accommodation,
            rental_car,
            flight,
            total,
        }
    }
}

/// Fee with the default rates
pub fn calculate_fees(input: &FeeInput) -> FeeBreakdown {
    FeeCalculator::default().calculate(input)
}

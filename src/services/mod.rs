//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod bank;
pub mod course;
pub mod currency;
pub mod deposit;
pub mod fees;
pub mod location;
pub mod quotation;
pub mod redis;
pub mod sync;
pub mod user;
pub mod withdrawal;

// Re-export commonly used services
pub use auth::{AuthContext, AuthService, Permission};
pub use bank::{BankClient, BankTransaction};
pub use course::CourseCatalog;
pub use currency::{CurrencyRate, CurrencyService};
pub use deposit::{DepositService, DepositSyncReport};
pub use fees::{FeeBreakdown, FeeCalculator, FeeInput};
pub use location::LocationService;
pub use quotation::QuotationService;
pub use redis::RedisService;
pub use sync::{SyncOptions, SyncReport, SyncService};
pub use user::UserService;
pub use withdrawal::WithdrawalService;

use serde::Serialize;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub quotation_service: QuotationService,
    pub withdrawal_service: WithdrawalService,
    pub deposit_service: DepositService,
    pub location_service: LocationService,
    pub currency_service: CurrencyService,
    pub course_catalog: CourseCatalog,
    pub fee_calculator: FeeCalculator,
    pub redis_service: Option<RedisService>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: &DatabaseService, redis_service: Option<RedisService>) -> Result<Self> {
        let fee_calculator = FeeCalculator::new(settings.fees.clone());
        let currency_cache = redis_service
            .clone()
            .filter(|_| settings.features.currency_cache);

        Ok(Self {
            auth_service: AuthService::new(
                db.identities.clone(),
                db.repos.users.clone(),
                settings.auth.clone(),
            ),
            user_service: UserService::new(db.identities.clone(), db.repos.users.clone()),
            quotation_service: QuotationService::new(db.repos.quotations.clone(), fee_calculator.clone()),
            withdrawal_service: WithdrawalService::new(db.repos.withdrawals.clone()),
            deposit_service: DepositService::new(
                db.repos.deposits.clone(),
                BankClient::new(settings.bank.clone())?,
            ),
            location_service: LocationService::new(db.repos.locations.clone()),
            currency_service: CurrencyService::new(settings.currency.clone(), currency_cache)?,
            course_catalog: CourseCatalog::bundled()?,
            fee_calculator,
            redis_service,
        })
    }

    /// Health check for storage and cache
    pub async fn health_check(&self, db: &DatabaseService) -> ServiceHealthStatus {
        let database_healthy = db.health_check().await.is_ok();
        let redis_healthy = match &self.redis_service {
            Some(redis) => Some(redis.health_check().await),
            None => None,
        };

        ServiceHealthStatus {
            database_healthy,
            redis_healthy,
            courses_loaded: self.course_catalog.len(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    /// `None` when no cache is configured
    pub redis_healthy: Option<bool>,
    pub courses_loaded: usize,
}

impl ServiceHealthStatus {
    /// Only the database is critical; the cache is bypassed when down
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if self.redis_healthy == Some(false) {
            issues.push("Redis connection failed".to_string());
        }
        issues
    }
}

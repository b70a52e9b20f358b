//! Application context shared by all request handlers

use std::sync::Arc;

use tracing::debug;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::i18n::I18n;
use crate::middleware::rate_limit::KeyedLimiter;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub database: DatabaseService,
    pub services: Arc<ServiceFactory>,
    pub i18n: Arc<I18n>,
    pub currency_limiter: KeyedLimiter,
}

impl AppState {
    pub fn new(settings: Settings, database: DatabaseService, services: ServiceFactory, i18n: I18n) -> Self {
        let currency_limiter =
            KeyedLimiter::per_minute("currency", settings.currency.requests_per_minute);
        Self {
            settings: Arc::new(settings),
            database,
            services: Arc::new(services),
            i18n: Arc::new(i18n),
            currency_limiter,
        }
    }

    /// Keyed limiters that need periodic pruning
    pub fn limiters(&self) -> Vec<KeyedLimiter> {
        vec![
            self.currency_limiter.clone(),
            self.services.auth_service.login_limiter().clone(),
        ]
    }

    /// Build state from settings and an already-connected database,
    /// wiring the cache when one is given
    pub async fn build(
        settings: Settings,
        database: DatabaseService,
        redis: Option<crate::services::RedisService>,
    ) -> Result<Self> {
        let services = ServiceFactory::new(&settings, &database, redis)?;
        let i18n = I18n::load(&settings.i18n).await?;
        let stats = i18n.get_stats();
        for lang in &stats.languages {
            debug!(lang = %lang.code, keys = lang.key_count, total = stats.total_keys, "Translations ready");
        }
        Ok(Self::new(settings, database, services, i18n))
    }
}

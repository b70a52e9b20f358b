//! Database service layer
//!
//! Bundles the three storage seams of one environment together with the
//! typed repositories over its document store.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::database::connection::{create_pool, ping, DatabasePool, PoolSettings};
use crate::database::memory::{MemoryDocumentStore, MemoryIdentityStore, MemoryObjectStore};
use crate::database::postgres::{PgDocumentStore, PgIdentityStore, PgObjectStore};
use crate::database::repositories::Repositories;
use crate::database::store::{DocumentStore, IdentityStore, ObjectStore};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct DatabaseService {
    pub documents: Arc<dyn DocumentStore>,
    pub identities: Arc<dyn IdentityStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub repos: Repositories,
    pool: Option<DatabasePool>,
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}

impl DatabaseService {
    /// Stores backed by a PostgreSQL pool
    pub fn new(pool: DatabasePool) -> Self {
        let mut service = Self::from_stores(
            Arc::new(PgDocumentStore::new(pool.clone())),
            Arc::new(PgIdentityStore::new(pool.clone())),
            Arc::new(PgObjectStore::new(pool.clone())),
        );
        service.pool = Some(pool);
        service
    }

    pub fn from_stores(
        documents: Arc<dyn DocumentStore>,
        identities: Arc<dyn IdentityStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            repos: Repositories::new(Arc::clone(&documents)),
            documents,
            identities,
            objects,
            pool: None,
        }
    }

    /// Fresh, empty in-memory stores
    pub fn in_memory() -> Self {
        Self::from_stores(
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryIdentityStore::new()),
            Arc::new(MemoryObjectStore::new()),
        )
    }

    /// Connect to a sync environment's database
    pub async fn connect(env: &EnvironmentConfig) -> Result<Self> {
        let pool = create_pool(&PoolSettings::from(env)).await?;
        Ok(Self::new(pool))
    }

    /// Underlying pool when backed by PostgreSQL
    pub fn pool(&self) -> Option<&DatabasePool> {
        self.pool.as_ref()
    }

    /// Check storage health; in-memory stores are always healthy
    pub async fn health_check(&self) -> Result<()> {
        match &self.pool {
            Some(pool) => ping(pool).await,
            None => Ok(()),
        }
    }
}

//! Database module
//!
//! This module handles database connections, the storage seams and the typed
//! repositories built on them

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{create_pool, ping, run_migrations, DatabasePool, PoolSettings};
pub use memory::{MemoryDocumentStore, MemoryIdentityStore, MemoryObjectStore};
pub use postgres::{PgDocumentStore, PgIdentityStore, PgObjectStore};
pub use repositories::{
    DepositRepository, LocationRepository, QuotationRepository, Repositories, UserRepository,
    WithdrawalRepository,
};
pub use service::DatabaseService;
pub use store::{DocumentStore, IdentityStore, ObjectStore};

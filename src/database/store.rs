//! Storage seams
//!
//! The hosted document database, the authentication service and object
//! storage are each reached through a trait so the same services run against
//! PostgreSQL in production and in-memory stores in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{CollectionPath, Document, DocumentPath, IdentityAccount, StoredObject};
use crate::utils::errors::Result;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Write `data` verbatim, replacing any existing document
    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()>;

    /// Insert only when absent; returns whether the document was written
    async fn create(&self, path: &DocumentPath, data: Value) -> Result<bool>;

    /// Returns whether a document was removed
    async fn delete(&self, path: &DocumentPath) -> Result<bool>;

    /// Documents of a collection ordered by id
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>>;

    /// Documents whose top-level `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>>;

    async fn list_root_collections(&self) -> Result<Vec<CollectionPath>>;

    async fn list_subcollections(&self, parent: &DocumentPath) -> Result<Vec<CollectionPath>>;

    async fn exists(&self, path: &DocumentPath) -> Result<bool> {
        Ok(self.get(path).await?.is_some())
    }
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<IdentityAccount>>;

    async fn get_by_email(&self, email: &str) -> Result<Option<IdentityAccount>>;

    /// Fails with `AlreadyExists` when the uid or email is taken
    async fn create(&self, account: &IdentityAccount) -> Result<()>;

    /// Replace an existing account; fails with `NotFound` when absent
    async fn update(&self, account: &IdentityAccount) -> Result<()>;

    async fn delete(&self, uid: &str) -> Result<bool>;

    /// All accounts ordered by email
    async fn list(&self) -> Result<Vec<IdentityAccount>>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<StoredObject>>;

    async fn exists(&self, name: &str) -> Result<bool>;

    async fn put(&self, object: &StoredObject) -> Result<()>;

    /// Object names starting with `prefix`, ordered by name
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}

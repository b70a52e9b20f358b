//! Database repositories module
//!
//! Each entity lives in a root collection of the document store. Repositories
//! are typed views over that collection; entity-specific queries are added in
//! the per-entity modules.

pub mod deposit;
pub mod user;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::database::store::DocumentStore;
use crate::models::deposit::DEPOSITS_COLLECTION;
use crate::models::location::LOCATIONS_COLLECTION;
use crate::models::quotation::QUOTATIONS_COLLECTION;
use crate::models::user::USERS_COLLECTION;
use crate::models::withdrawal::WITHDRAWALS_COLLECTION;
use crate::models::{CollectionPath, Deposit, Document, Location, Quotation, User, Withdrawal};
use crate::utils::errors::Result;

pub type QuotationRepository = TypedCollection<Quotation>;
pub type WithdrawalRepository = TypedCollection<Withdrawal>;
pub type DepositRepository = TypedCollection<Deposit>;
pub type UserRepository = TypedCollection<User>;
pub type LocationRepository = TypedCollection<Location>;

/// Typed access to one root collection
pub struct TypedCollection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TypedCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCollection").field("name", &self.name).finish()
    }
}

impl<T> TypedCollection<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self { store, name, _marker: PhantomData }
    }

    pub fn collection(&self) -> Result<CollectionPath> {
        CollectionPath::root(self.name)
    }

    fn decode(document: Document) -> Result<T> {
        Ok(serde_json::from_value(document.data)?)
    }

    /// Find entity by document id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        let path = self.collection()?.doc(id)?;
        self.store.get(&path).await?.map(Self::decode).transpose()
    }

    /// Create or replace the entity stored under `id`
    pub async fn save(&self, id: &str, entity: &T) -> Result<()> {
        let path = self.collection()?.doc(id)?;
        self.store.set(&path, serde_json::to_value(entity)?).await
    }

    /// Insert only when no document exists under `id`
    pub async fn insert_new(&self, id: &str, entity: &T) -> Result<bool> {
        let path = self.collection()?.doc(id)?;
        self.store.create(&path, serde_json::to_value(entity)?).await
    }

    /// Delete entity, returning whether it existed
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.collection()?.doc(id)?;
        self.store.delete(&path).await
    }

    /// List all entities ordered by id; undecodable documents are skipped
    pub async fn list(&self) -> Result<Vec<T>> {
        let documents = self.store.list(&self.collection()?).await?;
        Ok(self.decode_all(documents))
    }

    /// Entities whose top-level `field` equals `value`
    pub async fn find_by_field(&self, field: &str, value: &Value) -> Result<Vec<T>> {
        let documents = self
            .store
            .find_by_field(&self.collection()?, field, value)
            .await?;
        Ok(self.decode_all(documents))
    }

    fn decode_all(&self, documents: Vec<Document>) -> Vec<T> {
        documents
            .into_iter()
            .filter_map(|document| {
                let path = document.path.clone();
                match Self::decode(document) {
                    Ok(entity) => Some(entity),
                    Err(e) => {
                        warn!(collection = self.name, path = %path, error = %e, "Skipping malformed document");
                        None
                    }
                }
            })
            .collect()
    }
}

/// Repositories over one document store
#[derive(Clone, Debug)]
pub struct Repositories {
    pub quotations: QuotationRepository,
    pub withdrawals: WithdrawalRepository,
    pub deposits: DepositRepository,
    pub users: UserRepository,
    pub locations: LocationRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            quotations: TypedCollection::new(Arc::clone(&store), QUOTATIONS_COLLECTION),
            withdrawals: TypedCollection::new(Arc::clone(&store), WITHDRAWALS_COLLECTION),
            deposits: TypedCollection::new(Arc::clone(&store), DEPOSITS_COLLECTION),
            users: TypedCollection::new(Arc::clone(&store), USERS_COLLECTION),
            locations: TypedCollection::new(store, LOCATIONS_COLLECTION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryDocumentStore;
    use crate::models::DocumentPath;
    use chrono::Utc;
    use serde_json::json;

    fn location(id: &str, name: &str) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            country: "JP".to_string(),
            region: None,
            sort_order: 0,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_find_delete() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let repos = Repositories::new(store);

        repos.locations.save("fukuoka", &location("fukuoka", "Fukuoka")).await.unwrap();
        let found = repos.locations.find_by_id("fukuoka").await.unwrap().unwrap();
        assert_eq!(found.name, "Fukuoka");

        assert!(repos.locations.delete("fukuoka").await.unwrap());
        assert!(repos.locations.find_by_id("fukuoka").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_skips_malformed_documents() {
        let memory = MemoryDocumentStore::new();
        let store: Arc<dyn DocumentStore> = Arc::new(memory.clone());
        let repos = Repositories::new(store);

        repos.locations.save("a", &location("a", "Saga")).await.unwrap();
        memory
            .set(&DocumentPath::parse("locations/b").unwrap(), json!({"unexpected": true}))
            .await
            .unwrap();

        let listed = repos.locations.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Saga");
    }
}

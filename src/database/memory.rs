//! In-memory stores
//!
//! Used by the test suite and for running the server locally without
//! PostgreSQL. Semantics match the PostgreSQL stores, including the unique
//! deposit transaction code.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::database::store::{DocumentStore, IdentityStore, ObjectStore};
use crate::models::deposit::DEPOSITS_COLLECTION;
use crate::models::{CollectionPath, Document, DocumentPath, IdentityAccount, StoredObject};
use crate::utils::errors::{FiveMGolfError, Result};

#[derive(Clone, Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<BTreeMap<DocumentPath, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn transaction_code(collection: &CollectionPath, data: &Value) -> Option<String> {
    if collection.as_str() != DEPOSITS_COLLECTION {
        return None;
    }
    data.get("transaction_code")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        Ok(self.documents.read().await.get(path).cloned())
    }

    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let now = Utc::now();
        let mut documents = self.documents.write().await;
        match documents.get_mut(path) {
            Some(existing) => {
                existing.data = data;
                existing.updated_at = now;
            }
            None => {
                documents.insert(
                    path.clone(),
                    Document { path: path.clone(), data, created_at: now, updated_at: now },
                );
            }
        }
        Ok(())
    }

    async fn create(&self, path: &DocumentPath, data: Value) -> Result<bool> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(path) {
            return Ok(false);
        }

        let collection = path.collection();
        if let Some(code) = transaction_code(&collection, &data) {
            let taken = documents.values().any(|doc| {
                doc.path.collection() == collection
                    && transaction_code(&collection, &doc.data).as_deref() == Some(code.as_str())
            });
            if taken {
                return Ok(false);
            }
        }

        let now = Utc::now();
        documents.insert(
            path.clone(),
            Document { path: path.clone(), data, created_at: now, updated_at: now },
        );
        Ok(true)
    }

    async fn delete(&self, path: &DocumentPath) -> Result<bool> {
        Ok(self.documents.write().await.remove(path).is_some())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut found: Vec<Document> = documents
            .values()
            .filter(|doc| &doc.path.collection() == collection)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(found)
    }

    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .filter(|doc| doc.data.get(field) == Some(value))
            .collect())
    }

    async fn list_root_collections(&self) -> Result<Vec<CollectionPath>> {
        let documents = self.documents.read().await;
        let roots: BTreeSet<CollectionPath> = documents
            .keys()
            .map(DocumentPath::collection)
            .filter(|collection| collection.parent().is_none())
            .collect();
        Ok(roots.into_iter().collect())
    }

    async fn list_subcollections(&self, parent: &DocumentPath) -> Result<Vec<CollectionPath>> {
        let documents = self.documents.read().await;
        let subs: BTreeSet<CollectionPath> = documents
            .keys()
            .map(DocumentPath::collection)
            .filter(|collection| collection.parent().as_ref() == Some(parent))
            .collect();
        Ok(subs.into_iter().collect())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryIdentityStore {
    accounts: Arc<RwLock<BTreeMap<String, IdentityAccount>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get(&self, uid: &str) -> Result<Option<IdentityAccount>> {
        Ok(self.accounts.read().await.get(uid).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<IdentityAccount>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn create(&self, account: &IdentityAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.uid) {
            return Err(FiveMGolfError::AlreadyExists(account.uid.clone()));
        }
        if accounts.values().any(|existing| existing.email == account.email) {
            return Err(FiveMGolfError::AlreadyExists(account.email.clone()));
        }
        accounts.insert(account.uid.clone(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &IdentityAccount) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|existing| existing.email == account.email && existing.uid != account.uid)
        {
            return Err(FiveMGolfError::AlreadyExists(account.email.clone()));
        }
        match accounts.get_mut(&account.uid) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(FiveMGolfError::not_found("Account", account.uid.clone())),
        }
    }

    async fn delete(&self, uid: &str) -> Result<bool> {
        Ok(self.accounts.write().await.remove(uid).is_some())
    }

    async fn list(&self) -> Result<Vec<IdentityAccount>> {
        let mut accounts: Vec<IdentityAccount> =
            self.accounts.read().await.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(accounts)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, name: &str) -> Result<Option<StoredObject>> {
        Ok(self.objects.read().await.get(name).cloned())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.read().await.contains_key(name))
    }

    async fn put(&self, object: &StoredObject) -> Result<()> {
        self.objects
            .write()
            .await
            .insert(object.name.clone(), object.clone());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(path: &str) -> DocumentPath {
        DocumentPath::parse(path).unwrap()
    }

    #[tokio::test]
    async fn test_create_only_inserts_when_absent() {
        let store = MemoryDocumentStore::new();
        assert!(store.create(&doc("locations/l1"), json!({"name": "Fukuoka"})).await.unwrap());
        assert!(!store.create(&doc("locations/l1"), json!({"name": "Other"})).await.unwrap());

        let stored = store.get(&doc("locations/l1")).await.unwrap().unwrap();
        assert_eq!(stored.data["name"], "Fukuoka");
    }

    #[tokio::test]
    async fn test_deposit_transaction_code_is_unique() {
        let store = MemoryDocumentStore::new();
        let first = store
            .create(&doc("deposits/a"), json!({"transaction_code": "TX1"}))
            .await
            .unwrap();
        let second = store
            .create(&doc("deposits/b"), json!({"transaction_code": "TX1"}))
            .await
            .unwrap();
        assert!(first);
        assert!(!second);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_collections_and_subcollections() {
        let store = MemoryDocumentStore::new();
        store.set(&doc("quotations/q1"), json!({})).await.unwrap();
        store.set(&doc("quotations/q1/notes/n1"), json!({})).await.unwrap();
        store.set(&doc("quotations/q1/files/f1"), json!({})).await.unwrap();
        store.set(&doc("users/u1"), json!({"role": "user"})).await.unwrap();

        let roots = store.list_root_collections().await.unwrap();
        let roots: Vec<&str> = roots.iter().map(CollectionPath::as_str).collect();
        assert_eq!(roots, vec!["quotations", "users"]);

        let subs = store.list_subcollections(&doc("quotations/q1")).await.unwrap();
        let subs: Vec<&str> = subs.iter().map(CollectionPath::as_str).collect();
        assert_eq!(subs, vec!["quotations/q1/files", "quotations/q1/notes"]);

        let quotations = store.list(&CollectionPath::root("quotations").unwrap()).await.unwrap();
        assert_eq!(quotations.len(), 1);

        let users = store
            .find_by_field(&CollectionPath::root("users").unwrap(), "role", &json!("user"))
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_identity_email_uniqueness() {
        let store = MemoryIdentityStore::new();
        let account = IdentityAccount {
            uid: "u1".to_string(),
            email: "a@5mgolf.com".to_string(),
            display_name: None,
            password_hash: None,
            disabled: false,
            claims: json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.create(&account).await.unwrap();

        let mut other = account.clone();
        other.uid = "u2".to_string();
        assert!(matches!(store.create(&other).await, Err(FiveMGolfError::AlreadyExists(_))));
    }
}

//! PostgreSQL-backed stores
//!
//! Documents are kept in a single JSONB table keyed by path; the parent
//! document path and collection id are stored alongside so collections and
//! subcollections can be listed without parsing paths in SQL.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::database::store::{DocumentStore, IdentityStore, ObjectStore};
use crate::models::{CollectionPath, Document, DocumentPath, IdentityAccount, StoredObject};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::logging::log_database_operation;

#[derive(FromRow)]
struct DocumentRow {
    path: String,
    data: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = FiveMGolfError;

    fn try_from(row: DocumentRow) -> Result<Self> {
        Ok(Document {
            path: DocumentPath::parse(&row.path)?,
            data: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn collection_key(collection: &CollectionPath) -> (String, String) {
    let parent = collection
        .parent()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    (parent, collection.id().to_string())
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> FiveMGolfError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return FiveMGolfError::AlreadyExists(what.to_string());
        }
    }
    FiveMGolfError::Database(err)
}

/// Document store over the `documents` table
#[derive(Clone, Debug)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT path, data, created_at, updated_at FROM documents WHERE path = $1",
        )
        .bind(path.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let (parent, collection_id) = collection_key(&path.collection());
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO documents (path, parent_path, collection_id, doc_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (path) DO UPDATE
            SET data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(path.as_str())
        .bind(parent)
        .bind(collection_id)
        .bind(path.id())
        .bind(Json(data))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create(&self, path: &DocumentPath, data: Value) -> Result<bool> {
        let (parent, collection_id) = collection_key(&path.collection());
        let now = Utc::now();

        // Bare ON CONFLICT also covers the unique transaction-code index.
        let result = sqlx::query(
            r#"
            INSERT INTO documents (path, parent_path, collection_id, doc_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(path.as_str())
        .bind(parent)
        .bind(collection_id)
        .bind(path.id())
        .bind(Json(data))
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, path: &DocumentPath) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE path = $1")
            .bind(path.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        let started = Instant::now();
        let (parent, collection_id) = collection_key(collection);

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT path, data, created_at, updated_at
            FROM documents
            WHERE parent_path = $1 AND collection_id = $2
            ORDER BY doc_id
            "#,
        )
        .bind(parent)
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await;

        log_database_operation(
            "list",
            collection.as_str(),
            started.elapsed().as_millis() as u64,
            rows.is_ok(),
        );

        rows?.into_iter().map(Document::try_from).collect()
    }

    async fn find_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>> {
        let (parent, collection_id) = collection_key(collection);

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT path, data, created_at, updated_at
            FROM documents
            WHERE parent_path = $1 AND collection_id = $2 AND data -> $3::text = $4::jsonb
            ORDER BY doc_id
            "#,
        )
        .bind(parent)
        .bind(collection_id)
        .bind(field)
        .bind(Json(value))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    async fn list_root_collections(&self) -> Result<Vec<CollectionPath>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT collection_id FROM documents WHERE parent_path = '' ORDER BY collection_id",
        )
        .fetch_all(&self.pool)
        .await?;

        ids.into_iter()
            .map(|(id,)| CollectionPath::root(&id))
            .collect()
    }

    async fn list_subcollections(&self, parent: &DocumentPath) -> Result<Vec<CollectionPath>> {
        let ids: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT collection_id FROM documents WHERE parent_path = $1 ORDER BY collection_id",
        )
        .bind(parent.as_str())
        .fetch_all(&self.pool)
        .await?;

        ids.into_iter()
            .map(|(id,)| parent.subcollection(&id))
            .collect()
    }
}

#[derive(FromRow)]
struct AccountRow {
    uid: String,
    email: String,
    display_name: Option<String>,
    password_hash: Option<String>,
    disabled: bool,
    claims: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for IdentityAccount {
    fn from(row: AccountRow) -> Self {
        IdentityAccount {
            uid: row.uid,
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            disabled: row.disabled,
            claims: row.claims.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str =
    "uid, email, display_name, password_hash, disabled, claims, created_at, updated_at";

/// Identity store over the `identity_accounts` table
#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn get(&self, uid: &str) -> Result<Option<IdentityAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM identity_accounts WHERE uid = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityAccount::from))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<IdentityAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM identity_accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityAccount::from))
    }

    async fn create(&self, account: &IdentityAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO identity_accounts (uid, email, display_name, password_hash, disabled, claims, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&account.uid)
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(&account.password_hash)
        .bind(account.disabled)
        .bind(Json(&account.claims))
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &account.email))?;

        Ok(())
    }

    async fn update(&self, account: &IdentityAccount) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE identity_accounts
            SET email = $2,
                display_name = $3,
                password_hash = $4,
                disabled = $5,
                claims = $6,
                updated_at = $7
            WHERE uid = $1
            "#,
        )
        .bind(&account.uid)
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(&account.password_hash)
        .bind(account.disabled)
        .bind(Json(&account.claims))
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &account.email))?;

        if result.rows_affected() == 0 {
            return Err(FiveMGolfError::not_found("Account", account.uid.clone()));
        }

        Ok(())
    }

    async fn delete(&self, uid: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM identity_accounts WHERE uid = $1")
            .bind(uid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<IdentityAccount>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM identity_accounts ORDER BY email",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IdentityAccount::from).collect())
    }
}

#[derive(FromRow)]
struct ObjectRow {
    name: String,
    content_type: String,
    data: Vec<u8>,
    metadata: Json<Value>,
    updated_at: DateTime<Utc>,
}

/// Object store over the `storage_objects` table
#[derive(Clone, Debug)]
pub struct PgObjectStore {
    pool: PgPool,
}

impl PgObjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObjectStore for PgObjectStore {
    async fn get(&self, name: &str) -> Result<Option<StoredObject>> {
        let row = sqlx::query_as::<_, ObjectRow>(
            "SELECT name, content_type, data, metadata, updated_at FROM storage_objects WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredObject {
            name: row.name,
            content_type: row.content_type,
            data: row.data,
            metadata: row.metadata.0,
            updated_at: row.updated_at,
        }))
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM storage_objects WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn put(&self, object: &StoredObject) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO storage_objects (name, content_type, data, metadata, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO UPDATE
            SET content_type = EXCLUDED.content_type,
                data = EXCLUDED.data,
                metadata = EXCLUDED.metadata,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&object.name)
        .bind(&object.content_type)
        .bind(&object.data)
        .bind(Json(&object.metadata))
        .bind(object.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let names: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM storage_objects WHERE left(name, length($1)) = $1 ORDER BY name",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(|(name,)| name).collect())
    }
}

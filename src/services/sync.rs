//! Cross-environment data sync
//!
//! Copies documents, collections, identity accounts and storage objects from
//! one environment to another. Existing targets are left alone unless
//! overwrite is set. Per-item failures are recorded and the run continues.

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::info;

use crate::config::{EnvironmentConfig, Settings};
use crate::database::DatabaseService;
use crate::models::user::USERS_COLLECTION;
use crate::models::{CollectionPath, Document, DocumentPath, IdentityAccount, Role};
use crate::services::auth::hash_password;
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::{generate_random_password, normalize_email};
use crate::utils::logging::{log_sync_failure, log_sync_item};

const RESET_PASSWORD_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub overwrite: bool,
    /// Issue fresh passwords for every account written
    pub reset_passwords: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub kind: &'static str,
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedPassword {
    pub uid: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<SyncFailure>,
    pub issued_passwords: Vec<IssuedPassword>,
}

impl SyncReport {
    fn copied(&mut self, kind: &str, key: &str) {
        self.copied += 1;
        log_sync_item(kind, key, "copied");
    }

    fn skipped(&mut self, kind: &str, key: &str) {
        self.skipped += 1;
        log_sync_item(kind, key, "skipped");
    }

    fn failure(&mut self, kind: &'static str, key: &str, error: &FiveMGolfError) {
        self.failed += 1;
        log_sync_failure(kind, key, &error.to_string());
        self.failures.push(SyncFailure {
            kind,
            key: key.to_string(),
            error: error.to_string(),
        });
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failures.extend(other.failures);
        self.issued_passwords.extend(other.issued_passwords);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Which accounts a user sync copies
#[derive(Debug, Clone, Default)]
pub struct UserSelection {
    pub role: Option<Role>,
    pub emails: Vec<String>,
}

impl UserSelection {
    pub fn matches(&self, account: &IdentityAccount) -> bool {
        if self.role.is_some_and(|role| account.role() != Some(role)) {
            return false;
        }
        self.emails.is_empty()
            || self
                .emails
                .iter()
                .any(|email| normalize_email(email) == account.email)
    }
}

/// Resolve and check the source and target environment names
pub fn resolve_environments<'a>(
    settings: &'a Settings,
    from: &str,
    to: &str,
) -> Result<(&'a EnvironmentConfig, &'a EnvironmentConfig)> {
    if from == to {
        return Err(FiveMGolfError::InvalidInput(
            "Source and target environments must differ".to_string(),
        ));
    }
    let lookup = |name: &str| {
        settings.sync.environments.get(name).ok_or_else(|| {
            FiveMGolfError::Config(format!("Unknown environment: {}", name))
        })
    };
    Ok((lookup(from)?, lookup(to)?))
}

pub struct SyncService {
    source: DatabaseService,
    target: DatabaseService,
    options: SyncOptions,
}

impl SyncService {
    pub fn new(source: DatabaseService, target: DatabaseService, options: SyncOptions) -> Self {
        Self { source, target, options }
    }

    /// Copy one document (without its subcollections)
    pub async fn copy_document(&self, path: &DocumentPath) -> SyncReport {
        let mut report = SyncReport::default();
        match self.source.documents.get(path).await {
            Ok(Some(document)) => self.copy_document_data(&document, &mut report).await,
            Ok(None) => report.failure(
                "document",
                path.as_str(),
                &FiveMGolfError::not_found("Document", path.as_str()),
            ),
            Err(e) => report.failure("document", path.as_str(), &e),
        }
        report
    }

    /// Copy collections with all nested subcollections
    pub async fn copy_collections(&self, collections: &[CollectionPath]) -> SyncReport {
        let mut report = SyncReport::default();
        for collection in collections {
            info!(collection = %collection, "Copying collection");
            self.copy_collection(collection.clone(), &mut report).await;
        }
        report
    }

    /// Copy every root collection of the source
    pub async fn copy_all_collections(&self) -> Result<SyncReport> {
        let collections = self.source.documents.list_root_collections().await?;
        Ok(self.copy_collections(&collections).await)
    }

    fn copy_collection<'a>(
        &'a self,
        collection: CollectionPath,
        report: &'a mut SyncReport,
    ) -> BoxFuture<'a, ()> {
        async move {
            let documents = match self.source.documents.list(&collection).await {
                Ok(documents) => documents,
                Err(e) => {
                    report.failure("collection", collection.as_str(), &e);
                    return;
                }
            };

            for document in documents {
                self.copy_document_data(&document, report).await;

                match self.source.documents.list_subcollections(&document.path).await {
                    Ok(subcollections) => {
                        for sub in subcollections {
                            self.copy_collection(sub, report).await;
                        }
                    }
                    Err(e) => report.failure("collection", document.path.as_str(), &e),
                }
            }
        }
        .boxed()
    }

    async fn copy_document_data(&self, document: &Document, report: &mut SyncReport) {
        let key = document.path.as_str();
        match self.write_document(&document.path, &document.data).await {
            Ok(true) => report.copied("document", key),
            Ok(false) => report.skipped("document", key),
            Err(e) => report.failure("document", key, &e),
        }
    }

    async fn write_document(&self, path: &DocumentPath, data: &serde_json::Value) -> Result<bool> {
        if self.options.overwrite {
            self.target.documents.set(path, data.clone()).await?;
            Ok(true)
        } else {
            self.target.documents.create(path, data.clone()).await
        }
    }

    /// Copy identity accounts with their profiles
    pub async fn copy_users(&self, selection: &UserSelection) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let accounts = self.source.identities.list().await?;

        for account in accounts.into_iter().filter(|a| selection.matches(a)) {
            let key = format!("{} ({})", account.email, account.uid);
            match self.copy_user(account, &mut report).await {
                Ok(true) => report.copied("user", &key),
                Ok(false) => report.skipped("user", &key),
                Err(e) => report.failure("user", &key, &e),
            }
        }

        Ok(report)
    }

    async fn copy_user(&self, mut account: IdentityAccount, report: &mut SyncReport) -> Result<bool> {
        let existing = self.target.identities.get(&account.uid).await?;
        if existing.is_some() && !self.options.overwrite {
            return Ok(false);
        }

        if let Some(owner) = self.target.identities.get_by_email(&account.email).await? {
            if owner.uid != account.uid {
                return Err(FiveMGolfError::AlreadyExists(format!(
                    "{} is owned by {} in target",
                    account.email, owner.uid
                )));
            }
        }

        let issued = if self.options.reset_passwords {
            let password = generate_random_password(RESET_PASSWORD_LENGTH);
            account.password_hash = Some(hash_password(&password)?);
            Some(password)
        } else {
            None
        };

        if existing.is_some() {
            self.target.identities.update(&account).await?;
        } else {
            self.target.identities.create(&account).await?;
        }

        let profile_path = CollectionPath::root(USERS_COLLECTION)?.doc(&account.uid)?;
        // profile follows the same copy-if-absent rule as any document
        if let Some(profile) = self.source.documents.get(&profile_path).await? {
            if !self.write_document(&profile_path, &profile.data).await? {
                report.skipped("profile", profile_path.as_str());
            }
        }

        if let Some(password) = issued {
            report.issued_passwords.push(IssuedPassword {
                uid: account.uid,
                email: account.email,
                password,
            });
        }

        Ok(true)
    }

    /// Copy storage objects whose name starts with `prefix`
    pub async fn copy_storage(&self, prefix: &str) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let names = self.source.objects.list(prefix).await?;

        for name in names {
            match self.copy_object(&name).await {
                Ok(true) => report.copied("object", &name),
                Ok(false) => report.skipped("object", &name),
                Err(e) => report.failure("object", &name, &e),
            }
        }

        Ok(report)
    }

    async fn copy_object(&self, name: &str) -> Result<bool> {
        if !self.options.overwrite && self.target.objects.exists(name).await? {
            return Ok(false);
        }
        let object = self
            .source
            .objects
            .get(name)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("Object", name))?;
        self.target.objects.put(&object).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use assert_matches::assert_matches;

    fn env(url: &str) -> EnvironmentConfig {
        EnvironmentConfig {
            database_url: url.to_string(),
            max_connections: 2,
        }
    }

    #[test]
    fn test_resolve_environments() {
        let mut settings = Settings::default();
        settings.sync.environments.insert("dev".to_string(), env("postgresql://dev/db"));
        settings.sync.environments.insert("prod".to_string(), env("postgresql://prod/db"));

        let (from, to) = resolve_environments(&settings, "dev", "prod").unwrap();
        assert!(from.database_url.contains("dev"));
        assert!(to.database_url.contains("prod"));

        assert_matches!(
            resolve_environments(&settings, "dev", "dev"),
            Err(FiveMGolfError::InvalidInput(_))
        );
        assert_matches!(
            resolve_environments(&settings, "dev", "staging"),
            Err(FiveMGolfError::Config(_))
        );
    }

    #[test]
    fn test_report_merge() {
        let mut report = SyncReport::default();
        report.copied("document", "a/1");
        let mut other = SyncReport::default();
        other.skipped("document", "a/2");
        other.failure("document", "a/3", &FiveMGolfError::InvalidInput("x".to_string()));

        report.merge(other);
        assert_eq!((report.copied, report.skipped, report.failed), (1, 1, 1));
        assert!(report.has_failures());
        assert_eq!(report.failures[0].key, "a/3");
    }
}

//! Document store addressing
//!
//! Documents live at slash-separated paths with an even number of segments
//! (`quotations/q1`, `quotations/q1/notes/n1`); collections at paths with an
//! odd number of segments (`quotations`, `quotations/q1/notes`).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::{FiveMGolfError, Result};

fn split_segments(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(FiveMGolfError::InvalidInput("Path must not be empty".to_string()));
    }

    let segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
    if segments.iter().any(|s| s.is_empty() || s.trim() != s) {
        return Err(FiveMGolfError::InvalidInput(format!("Invalid path: {}", raw)));
    }

    Ok(segments)
}

/// Path of a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionPath(String);

/// Path of a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl CollectionPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let segments = split_segments(raw)?;
        if segments.len() % 2 == 0 {
            return Err(FiveMGolfError::InvalidInput(format!(
                "Collection path needs an odd number of segments: {}",
                raw
            )));
        }
        Ok(Self(segments.join("/")))
    }

    /// Root collection with the given id
    pub fn root(id: &str) -> Result<Self> {
        Self::parse(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Document owning this collection, `None` for root collections
    pub fn parent(&self) -> Option<DocumentPath> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| DocumentPath(parent.to_string()))
    }

    /// Path of the document `id` inside this collection
    pub fn doc(&self, id: &str) -> Result<DocumentPath> {
        DocumentPath::parse(&format!("{}/{}", self.0, id))
    }
}

impl DocumentPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let segments = split_segments(raw)?;
        if segments.len() % 2 != 0 {
            return Err(FiveMGolfError::InvalidInput(format!(
                "Document path needs an even number of segments: {}",
                raw
            )));
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Document id (last segment)
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Collection containing this document
    pub fn collection(&self) -> CollectionPath {
        let (parent, _) = self
            .0
            .rsplit_once('/')
            .unwrap_or((self.0.as_str(), ""));
        CollectionPath(parent.to_string())
    }

    /// Subcollection `id` under this document
    pub fn subcollection(&self, id: &str) -> Result<CollectionPath> {
        CollectionPath::parse(&format!("{}/{}", self.0, id))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = FiveMGolfError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = FiveMGolfError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CollectionPath> for String {
    fn from(value: CollectionPath) -> Self {
        value.0
    }
}

impl From<DocumentPath> for String {
    fn from(value: DocumentPath) -> Self {
        value.0
    }
}

/// A stored document with its raw JSON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: DocumentPath,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.path.id()
    }
}

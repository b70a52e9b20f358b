//! Location reference data

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding locations
pub const LOCATIONS_COLLECTION: &str = "locations";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

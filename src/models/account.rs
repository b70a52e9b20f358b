//! Identity account and storage object models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::Role;

/// Credential record held by the identity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAccount {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: Option<String>,
    pub disabled: bool,
    /// Custom claims; the admin role is mirrored under `role`
    pub claims: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdentityAccount {
    /// Role carried in the custom claims, if any
    pub fn role(&self) -> Option<Role> {
        self.claims
            .get("role")
            .and_then(Value::as_str)
            .and_then(|role| role.parse().ok())
    }
}

/// Binary object held by the object store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub name: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub metadata: Value,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_from_claims() {
        let mut account = IdentityAccount {
            uid: "u1".to_string(),
            email: "a@5mgolf.com".to_string(),
            display_name: None,
            password_hash: None,
            disabled: false,
            claims: json!({"role": "site_admin"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(account.role(), Some(Role::SiteAdmin));

        account.claims = json!({});
        assert_eq!(account.role(), None);
    }
}

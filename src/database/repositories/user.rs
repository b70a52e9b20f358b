//! User profile repository queries

use serde_json::Value;

use super::UserRepository;
use crate::models::{Role, User};
use crate::utils::errors::Result;

impl UserRepository {
    /// Find a profile by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut found = self
            .find_by_field("email", &Value::String(email.to_string()))
            .await?;
        Ok(found.pop())
    }

    /// Count active profiles holding the given role
    pub async fn count_active_by_role(&self, role: Role) -> Result<usize> {
        let found = self
            .find_by_field("role", &Value::String(role.as_str().to_string()))
            .await?;
        Ok(found.iter().filter(|user| user.active).count())
    }
}

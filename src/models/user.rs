//! User model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::FiveMGolfError;

/// Collection holding user profiles
pub const USERS_COLLECTION: &str = "users";

/// Admin console role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    CourseAdmin,
    SiteAdmin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::CourseAdmin => "course_admin",
            Role::SiteAdmin => "site_admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Roles that only a super admin may grant
    pub fn is_admin_role(&self) -> bool {
        matches!(self, Role::SiteAdmin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FiveMGolfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(Role::User),
            "course_admin" => Ok(Role::CourseAdmin),
            "site_admin" => Ok(Role::SiteAdmin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(FiveMGolfError::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// User profile stored in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub course_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub password: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub course_id: Option<String>,
}

/// Filters for listing users in the admin console
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(active) = self.active {
            if user.active != active {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            return user.email.to_lowercase().contains(&needle)
                || user.display_name.to_lowercase().contains(&needle);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in [Role::User, Role::CourseAdmin, Role::SiteAdmin, Role::SuperAdmin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(serde_json::to_value(role).unwrap(), role.as_str());
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::SuperAdmin > Role::SiteAdmin);
        assert!(Role::SiteAdmin > Role::CourseAdmin);
        assert!(Role::SiteAdmin.is_admin_role());
        assert!(!Role::CourseAdmin.is_admin_role());
    }
}

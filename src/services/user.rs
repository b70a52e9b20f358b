//! User service implementation
//!
//! Account creation and profile management for the admin console. Credentials
//! live in the identity store with the role mirrored into custom claims;
//! profiles live in the `users` collection.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::database::{IdentityStore, UserRepository};
use crate::models::{CreateUserRequest, IdentityAccount, Role, UpdateUserRequest, User, UserFilter};
use crate::services::auth::{hash_password, AuthContext};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::{generate_document_id, generate_random_password, is_valid_email, normalize_email};
use crate::utils::logging::log_admin_action;

pub const MIN_PASSWORD_LENGTH: usize = 8;
const GENERATED_PASSWORD_LENGTH: usize = 12;

/// Result of account creation; the password is only set when generated
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUser {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

fn validate_course(role: Role, course_id: Option<&str>) -> Result<()> {
    if role == Role::CourseAdmin && course_id.map_or(true, |c| c.trim().is_empty()) {
        return Err(FiveMGolfError::InvalidInput(
            "course_admin requires a course_id".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    identities: Arc<dyn IdentityStore>,
    users: UserRepository,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(identities: Arc<dyn IdentityStore>, users: UserRepository) -> Self {
        Self { identities, users }
    }

    /// Create the identity account, then the profile
    pub async fn create_user(&self, request: CreateUserRequest, actor: &AuthContext) -> Result<CreatedUser> {
        actor.require_role_management(request.role)?;

        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(FiveMGolfError::InvalidInput(format!("Invalid email: {}", request.email)));
        }
        let display_name = request.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(FiveMGolfError::InvalidInput("Display name is required".to_string()));
        }
        validate_course(request.role, request.course_id.as_deref())?;

        let (password, generated_password) = match request.password {
            Some(password) if password.chars().count() < MIN_PASSWORD_LENGTH => {
                return Err(FiveMGolfError::InvalidInput(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                )));
            }
            Some(password) => (password, None),
            None => {
                let generated = generate_random_password(GENERATED_PASSWORD_LENGTH);
                (generated.clone(), Some(generated))
            }
        };

        if self.identities.get_by_email(&email).await?.is_some()
            || self.users.find_by_email(&email).await?.is_some()
        {
            return Err(FiveMGolfError::AlreadyExists(email));
        }

        let now = Utc::now();
        let uid = generate_document_id();
        let account = IdentityAccount {
            uid: uid.clone(),
            email: email.clone(),
            display_name: Some(display_name.clone()),
            password_hash: Some(hash_password(&password)?),
            disabled: false,
            claims: json!({ "role": request.role.as_str() }),
            created_at: now,
            updated_at: now,
        };
        self.identities.create(&account).await?;

        let user = User {
            uid: uid.clone(),
            email,
            display_name,
            role: request.role,
            active: true,
            course_id: request.course_id.filter(|c| !c.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.users.save(&uid, &user).await {
            error!(uid = %uid, error = %e, "Profile write failed, removing identity account");
            if let Err(cleanup) = self.identities.delete(&uid).await {
                error!(uid = %uid, error = %cleanup, "Failed to remove identity account");
            }
            return Err(e);
        }

        log_admin_action(&actor.uid, "create_user", Some(uid.as_str()), Some(user.role.as_str()));
        info!(uid = %uid, role = %user.role, "User created");

        Ok(CreatedUser { user, generated_password })
    }

    pub async fn get_user(&self, uid: &str) -> Result<User> {
        self.users
            .find_by_id(uid)
            .await?
            .ok_or_else(|| FiveMGolfError::not_found("User", uid))
    }

    /// Profiles matching the filter, ordered by email
    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Update profile fields, keeping identity claims and disabled flag in sync
    pub async fn update_user(&self, uid: &str, request: UpdateUserRequest, actor: &AuthContext) -> Result<User> {
        let mut user = self.get_user(uid).await?;
        actor.require_role_management(user.role)?;
        if let Some(role) = request.role {
            actor.require_role_management(role)?;
        }
        if uid == actor.uid && request.role.is_some_and(|role| role != user.role) {
            return Err(FiveMGolfError::PermissionDenied("Cannot change own role".to_string()));
        }

        let demoted = request.role.is_some_and(|role| role != Role::SuperAdmin);
        let deactivated = request.active == Some(false);
        if user.role == Role::SuperAdmin && user.active && (demoted || deactivated) {
            self.ensure_not_last_super_admin().await?;
        }

        if let Some(display_name) = request.display_name {
            let display_name = display_name.trim().to_string();
            if display_name.is_empty() {
                return Err(FiveMGolfError::InvalidInput("Display name is required".to_string()));
            }
            user.display_name = display_name;
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(active) = request.active {
            user.active = active;
        }
        if let Some(course_id) = request.course_id {
            user.course_id = Some(course_id).filter(|c| !c.trim().is_empty());
        }
        validate_course(user.role, user.course_id.as_deref())?;
        user.updated_at = Utc::now();

        if let Some(mut account) = self.identities.get(uid).await? {
            account.display_name = Some(user.display_name.clone());
            account.disabled = !user.active;
            if let Some(claims) = account.claims.as_object_mut() {
                claims.insert("role".to_string(), json!(user.role.as_str()));
            } else {
                account.claims = json!({ "role": user.role.as_str() });
            }
            account.updated_at = user.updated_at;
            self.identities.update(&account).await?;
        }

        self.users.save(uid, &user).await?;
        log_admin_action(&actor.uid, "update_user", Some(uid), Some(user.role.as_str()));
        Ok(user)
    }

    async fn ensure_not_last_super_admin(&self) -> Result<()> {
        if self.users.count_active_by_role(Role::SuperAdmin).await? <= 1 {
            return Err(FiveMGolfError::PermissionDenied(
                "At least one active super_admin must remain".to_string(),
            ));
        }
        Ok(())
    }

    /// Remove profile and identity account
    pub async fn delete_user(&self, uid: &str, actor: &AuthContext) -> Result<()> {
        if uid == actor.uid {
            return Err(FiveMGolfError::PermissionDenied("Cannot delete own account".to_string()));
        }
        let user = self.get_user(uid).await?;
        actor.require_role_management(user.role)?;
        if user.role == Role::SuperAdmin && user.active {
            self.ensure_not_last_super_admin().await?;
        }

        self.identities.delete(uid).await?;
        self.users.delete(uid).await?;

        log_admin_action(&actor.uid, "delete_user", Some(uid), None);
        Ok(())
    }
}

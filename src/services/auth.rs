//! Authentication service implementation
//!
//! Password login against the identity store, signed session tokens and the
//! role-based permission table of the admin console.

use std::collections::HashSet;
use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::database::{IdentityStore, UserRepository};
use crate::middleware::rate_limit::KeyedLimiter;
use crate::models::{Role, User};
use crate::utils::errors::{FiveMGolfError, Result};
use crate::utils::helpers::normalize_email;

/// Admin console capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ManageQuotations,
    ManageWithdrawals,
    ManageDeposits,
    ManageLocations,
    /// Manage users holding non-admin roles
    ManageUsers,
    /// Grant or revoke site/super admin roles
    ManageAdmins,
}

impl Permission {
    pub fn granted_to(role: Role) -> HashSet<Permission> {
        use Permission::*;
        match role {
            Role::User => HashSet::new(),
            Role::CourseAdmin => [ManageQuotations].into_iter().collect(),
            Role::SiteAdmin => [
                ManageQuotations,
                ManageWithdrawals,
                ManageDeposits,
                ManageLocations,
                ManageUsers,
            ]
            .into_iter()
            .collect(),
            Role::SuperAdmin => [
                ManageQuotations,
                ManageWithdrawals,
                ManageDeposits,
                ManageLocations,
                ManageUsers,
                ManageAdmins,
            ]
            .into_iter()
            .collect(),
        }
    }
}

/// Authenticated caller of an admin endpoint
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub uid: String,
    pub email: String,
    pub role: Role,
    pub permissions: HashSet<Permission>,
}

impl AuthContext {
    pub fn new(uid: String, email: String, role: Role) -> Self {
        Self {
            uid,
            email,
            permissions: Permission::granted_to(role),
            role,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<()> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            debug!(uid = %self.uid, role = %self.role, ?permission, "Permission denied");
            Err(FiveMGolfError::PermissionDenied(format!(
                "{} may not {:?}",
                self.role, permission
            )))
        }
    }

    /// Whether this caller may manage an account holding `role`
    pub fn require_role_management(&self, role: Role) -> Result<()> {
        if role.is_admin_role() {
            self.require(Permission::ManageAdmins)
        } else {
            self.require(Permission::ManageUsers)
        }
    }
}

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Hash a password with argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| FiveMGolfError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| FiveMGolfError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn IdentityStore>,
    users: UserRepository,
    config: AuthConfig,
    login_limiter: KeyedLimiter,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(identities: Arc<dyn IdentityStore>, users: UserRepository, config: AuthConfig) -> Self {
        let login_limiter = KeyedLimiter::per_minute("login", config.login_attempts_per_minute);
        Self { identities, users, config, login_limiter }
    }

    pub fn login_limiter(&self) -> &KeyedLimiter {
        &self.login_limiter
    }

    /// Sign a token for the given identity
    pub fn issue_token(&self, uid: &str, email: &str, role: Role) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.config.token_ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                FiveMGolfError::Config(format!(
                    "Token TTL out of range: {} hours",
                    self.config.token_ttl_hours
                ))
            })?;
        let claims = Claims {
            sub: uid.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;
        Ok((token, expires_at))
    }

    /// Decode and check a bearer token
    pub fn verify_token(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| FiveMGolfError::Authentication(format!("Invalid token: {}", e)))?;

        let claims = data.claims;
        Ok(AuthContext::new(claims.sub, claims.email, claims.role))
    }

    /// Verify a token and reload the caller's profile so deactivation and
    /// role changes take effect before the token expires
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.verify_token(token)?;
        let user = self
            .users
            .find_by_id(&claims.uid)
            .await?
            .filter(|user| user.active)
            .ok_or_else(|| FiveMGolfError::Authentication("Account is no longer active".to_string()))?;

        if user.role != claims.role {
            debug!(uid = %user.uid, token_role = %claims.role, role = %user.role, "Role changed since token issue");
        }
        Ok(AuthContext::new(user.uid, user.email, user.role))
    }

    /// Password login; unknown emails and wrong passwords are indistinguishable
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let email = normalize_email(email);
        self.login_limiter.check(&email)?;

        let invalid = || FiveMGolfError::Authentication("Invalid email or password".to_string());

        let account = self.identities.get_by_email(&email).await?.ok_or_else(invalid)?;
        let hash = account.password_hash.as_deref().ok_or_else(invalid)?;
        if !verify_password(password, hash)? {
            warn!(email = %email, "Failed login attempt");
            return Err(invalid());
        }
        if account.disabled {
            return Err(FiveMGolfError::Authentication("Account is disabled".to_string()));
        }

        let user = self
            .users
            .find_by_id(&account.uid)
            .await?
            .ok_or_else(|| FiveMGolfError::Authentication("No profile for account".to_string()))?;
        if !user.active {
            return Err(FiveMGolfError::Authentication("Account is inactive".to_string()));
        }

        let (token, expires_at) = self.issue_token(&user.uid, &user.email, user.role)?;
        info!(uid = %user.uid, role = %user.role, "User logged in");

        Ok(LoginResponse { token, expires_at, user })
    }

    /// Check the `Authorization` header value sent by the scheduler
    pub fn verify_cron_secret(&self, authorization: Option<&str>) -> Result<()> {
        let expected = format!("Bearer {}", self.config.cron_secret);
        match authorization {
            Some(value) if value == expected => Ok(()),
            _ => Err(FiveMGolfError::Authentication("Invalid cron secret".to_string())),
        }
    }
}

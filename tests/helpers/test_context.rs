//! Test context for unified test setup
//!
//! Builds the full application state over in-memory stores and drives the
//! router with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use fivemgolf::config::Settings;
use fivemgolf::database::DatabaseService;
use fivemgolf::models::{IdentityAccount, Role, User};
use fivemgolf::services::auth::hash_password;
use fivemgolf::{create_router, AppState};

pub const TEST_PASSWORD: &str = "Fairway2024!";

/// Settings pointing at the repository translations, without Redis
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.i18n.translations_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/translations").to_string();
    settings.features.currency_cache = false;
    settings.features.test_endpoint = true;
    settings.bank.account_number = "110-123-456789".to_string();
    settings.bank.api_key = "test-bank-key".to_string();
    settings
}

pub struct TestContext {
    pub settings: Settings,
    pub database: DatabaseService,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_settings(test_settings()).await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let database = DatabaseService::in_memory();
        let state = AppState::build(settings.clone(), database.clone(), None)
            .await
            .expect("Failed to build application state");

        Self { settings, database, state }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Create an identity account with profile and return it with a session token
    pub async fn seed_user(&self, email: &str, role: Role) -> (User, String) {
        let now = Utc::now();
        let uid = format!("uid-{}", email.split('@').next().unwrap_or(email));

        self.database
            .identities
            .create(&IdentityAccount {
                uid: uid.clone(),
                email: email.to_string(),
                display_name: Some(email.to_string()),
                password_hash: Some(hash_password(TEST_PASSWORD).unwrap()),
                disabled: false,
                claims: json!({ "role": role.as_str() }),
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("Failed to seed identity account");

        let user = User {
            uid: uid.clone(),
            email: email.to_string(),
            display_name: email.to_string(),
            role,
            active: true,
            course_id: (role == Role::CourseAdmin).then(|| "fukuoka-century".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.database.repos.users.save(&uid, &user).await.expect("Failed to seed profile");

        let (token, _) = self
            .state
            .services
            .auth_service
            .issue_token(&uid, email, role)
            .expect("Failed to issue token");
        (user, token)
    }

    /// Send a request through the router and decode the JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.send(method, uri, &[], token, body).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }
}

//! Test helpers for vitrine-auth integration tests.
//!
//! Builds the real router over an in-memory organization store, the Argon2
//! verifier and either the HS256 JWT manager or a fixed token table.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use service_core::config::Config;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vitrine_auth::{
    config::{AuthConfig, DatabaseConfig, Environment, JwtConfig, JwtSigning, SecurityConfig},
    models::{Organization, PermissionSet, TokenClaims, User},
    services::{
        AuthService, JwtTokenManager, MemoryOrganizationStore, OrganizationGetter, StoreError,
        TokenError, TokenManager,
    },
    utils::{hash_password, HashVerifier},
    AppState,
};

pub const TEST_EMAIL: &str = "a@org.com";
pub const TEST_PASSWORD: &str = "secret";

pub fn test_config() -> AuthConfig {
    AuthConfig {
        common: Config::default(),
        environment: Environment::Dev,
        service_name: "vitrine-auth-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            signing: JwtSigning::Secret("integration-test-secret".to_string()),
            token_expiry_minutes: 15,
            default_permissions: Vec::new(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        request_timeout_seconds: 5,
        defaulted_secrets: Vec::new(),
    }
}

/// Organization 1, owned by user 1 (`a@org.com` / `secret`).
pub fn test_organization() -> Organization {
    Organization {
        id: 1,
        name: "Instituto Esperança".to_string(),
        logo: "esperanca.png".to_string(),
        slug: "instituto-esperanca".to_string(),
        user: User {
            id: 1,
            email: TEST_EMAIL.to_string(),
            password: hash_password(TEST_PASSWORD).expect("Failed to hash password"),
        },
    }
}

/// Wraps a store and counts lookups.
pub struct CountingStore<S> {
    inner: S,
    pub calls: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: OrganizationGetter> OrganizationGetter for CountingStore<S> {
    async fn get_by_email(&self, email: &str) -> Result<Organization, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_by_email(email).await
    }
}

/// Token manager with a fixed table: issues `T<user id>` and validates only
/// tokens present in the table.
#[derive(Default)]
pub struct FixedTokens {
    pub valid: HashMap<String, TokenClaims>,
    pub fail_issuance: bool,
}

impl FixedTokens {
    pub fn with_token(mut self, token: &str, user_id: i64, permissions: &[&str]) -> Self {
        self.valid.insert(
            token.to_string(),
            TokenClaims {
                user_id,
                permissions: permissions.iter().copied().collect::<PermissionSet>(),
            },
        );
        self
    }
}

#[async_trait]
impl TokenManager for FixedTokens {
    async fn create_token(
        &self,
        user: &User,
        _permissions: Option<&[String]>,
    ) -> Result<String, anyhow::Error> {
        if self.fail_issuance {
            anyhow::bail!("signing key unavailable");
        }
        Ok(format!("T{}", user.id))
    }

    async fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.valid
            .get(token)
            .cloned()
            .ok_or_else(|| TokenError::Invalid("signature mismatch".to_string()))
    }
}

pub fn state_with(
    store: Arc<dyn OrganizationGetter>,
    tokens: Arc<dyn TokenManager>,
) -> AppState {
    AppState {
        config: test_config(),
        auth_service: AuthService::new(store, Arc::new(HashVerifier), tokens.clone()),
        tokens,
        db: None,
    }
}

/// State backed by the HS256 JWT manager and the seeded organization.
pub fn jwt_state() -> AppState {
    let store = MemoryOrganizationStore::with_organizations([test_organization()]);
    let config = test_config();
    let tokens = Arc::new(JwtTokenManager::new(&config.jwt).expect("Failed to create JWT manager"));
    state_with(Arc::new(store), tokens)
}

pub fn login_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn credentials(email: &str, password: &str) -> String {
    serde_json::json!({ "email": email, "password": password }).to_string()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

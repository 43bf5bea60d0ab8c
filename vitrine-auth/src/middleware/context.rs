//! Per-request authentication context and its typed accessors.
//!
//! The context lives in the request's own extensions, so concurrent requests
//! can never observe each other's identity. Every accessor fails with
//! [`AuthError::ContextMissing`] when the request did not pass through
//! [`auth_middleware`](super::auth_middleware).

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};

use crate::models::{PermissionSet, TokenClaims};
use crate::services::AuthError;

/// Identity established by the auth middleware for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAuthContext {
    token: String,
    user_id: i64,
    permissions: PermissionSet,
}

impl RequestAuthContext {
    pub fn new(token: String, claims: TokenClaims) -> Self {
        Self {
            token,
            user_id: claims.user_id,
            permissions: claims.permissions,
        }
    }

    pub fn from_extensions(extensions: &Extensions) -> Result<&Self, AuthError> {
        extensions
            .get::<RequestAuthContext>()
            .ok_or(AuthError::ContextMissing)
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Raw token string as presented by the client.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn has_permission(&self, label: &str) -> bool {
        self.permissions.contains(label)
    }
}

/// Authenticated user id of the current request.
pub fn user_id(extensions: &Extensions) -> Result<i64, AuthError> {
    RequestAuthContext::from_extensions(extensions).map(RequestAuthContext::user_id)
}

/// Raw bearer token of the current request.
pub fn token(extensions: &Extensions) -> Result<&str, AuthError> {
    RequestAuthContext::from_extensions(extensions).map(RequestAuthContext::token)
}

/// Whether the current token was issued with `label`.
pub fn has_permission(extensions: &Extensions, label: &str) -> Result<bool, AuthError> {
    RequestAuthContext::from_extensions(extensions).map(|ctx| ctx.has_permission(label))
}

/// Extractor handing the request's [`RequestAuthContext`] to a handler.
pub struct Authenticated(pub RequestAuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = RequestAuthContext::from_extensions(&parts.extensions).map_err(|e| {
            tracing::error!("Handler requires authentication but the auth middleware did not run");
            e
        })?;

        Ok(Authenticated(context.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RequestAuthContext {
        RequestAuthContext::new(
            "T1".to_string(),
            TokenClaims {
                user_id: 1,
                permissions: ["edit"].into_iter().collect(),
            },
        )
    }

    #[test]
    fn test_accessors_read_populated_context() {
        let mut extensions = Extensions::new();
        extensions.insert(context());

        assert_eq!(user_id(&extensions).unwrap(), 1);
        assert_eq!(token(&extensions).unwrap(), "T1");
        assert!(has_permission(&extensions, "edit").unwrap());
        assert!(!has_permission(&extensions, "delete").unwrap());
    }

    #[test]
    fn test_accessors_fail_without_context() {
        let extensions = Extensions::new();

        assert!(matches!(user_id(&extensions), Err(AuthError::ContextMissing)));
        assert!(matches!(token(&extensions), Err(AuthError::ContextMissing)));
        assert!(matches!(
            has_permission(&extensions, "edit"),
            Err(AuthError::ContextMissing)
        ));
    }

    #[tokio::test]
    async fn test_extractor_rejects_unauthenticated_request() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/")
            .body(())
            .unwrap()
            .into_parts();

        let result = Authenticated::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::ContextMissing)));

        parts.extensions.insert(context());
        let Authenticated(ctx) = Authenticated::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ctx, context());
    }
}

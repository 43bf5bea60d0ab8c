mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::*;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use vitrine_auth::{
    build_router,
    models::Organization,
    services::{MemoryOrganizationStore, OrganizationGetter, StoreError, TokenManager},
};

/// Store that never answers within the request deadline.
struct StalledStore;

#[async_trait]
impl OrganizationGetter for StalledStore {
    async fn get_by_email(&self, email: &str) -> Result<Organization, StoreError> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Err(StoreError::NotFound(email.to_string()))
    }
}

fn counting_app(tokens: FixedTokens) -> (axum::Router, Arc<CountingStore<MemoryOrganizationStore>>) {
    let store = Arc::new(CountingStore::new(
        MemoryOrganizationStore::with_organizations([test_organization()]),
    ));
    let app = build_router(state_with(store.clone(), Arc::new(tokens)));
    (app, store)
}

#[tokio::test]
async fn test_login_returns_token_and_public_organization() {
    let state = jwt_state();
    let tokens = state.tokens.clone();
    let app = build_router(state);

    let response = app
        .oneshot(login_request(&credentials(TEST_EMAIL, TEST_PASSWORD)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(
        body["organization"],
        serde_json::json!({
            "id": 1,
            "name": "Instituto Esperança",
            "logo": "esperanca.png",
            "slug": "instituto-esperanca"
        })
    );
    assert!(body.get("user").is_none());
    assert!(!body.to_string().contains("argon2"));

    let token = body["token"].as_str().expect("token should be a string");
    let claims = tokens.validate_token(token).await.expect("token should validate");
    assert_eq!(claims.user_id, 1);
}

#[tokio::test]
async fn test_issued_token_comes_from_token_manager() {
    let (app, _) = counting_app(FixedTokens::default());

    let response = app
        .oneshot(login_request(&credentials("a@org.com", "secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["organization"]["id"], 1);
    assert_eq!(body["token"], "T1");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_get_identical_401() {
    let (app, _) = counting_app(FixedTokens::default());

    let wrong = app
        .clone()
        .oneshot(login_request(&credentials(TEST_EMAIL, "wrong")))
        .await
        .unwrap();
    let missing = app
        .oneshot(login_request(&credentials("missing@org.com", TEST_PASSWORD)))
        .await
        .unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = body_json(wrong).await;
    let missing = body_json(missing).await;
    assert_eq!(wrong, missing);
    assert_eq!(
        wrong,
        serde_json::json!({ "code": 401, "message": "Invalid email or password" })
    );
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected_before_lookup() {
    let bodies = [
        "not json",
        r#"{"email": "a@org.com"}"#,
        r#"{"email": 42, "password": "secret"}"#,
        r#"{"email": "a@org.com", "password": ""}"#,
        r#"{"email": "", "password": "secret"}"#,
    ];

    for body in bodies {
        let (app, store) = counting_app(FixedTokens::default());

        let response = app.oneshot(login_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json = body_json(response).await;
        assert_eq!(json["code"], 400);
        assert_eq!(store.calls(), 0, "body: {body}");
    }
}

#[tokio::test]
async fn test_signing_failure_is_500_not_401() {
    let (app, store) = counting_app(FixedTokens {
        fail_issuance: true,
        ..FixedTokens::default()
    });

    let response = app
        .oneshot(login_request(&credentials(TEST_EMAIL, TEST_PASSWORD)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], 500);
    assert!(!body["message"].as_str().unwrap().contains("signing key"));
    assert_eq!(store.calls(), 1);
}

#[tokio::test]
async fn test_overrunning_login_gets_timeout_envelope() {
    let mut state = state_with(Arc::new(StalledStore), Arc::new(FixedTokens::default()));
    state.config.request_timeout_seconds = 1;
    let app = build_router(state);

    let response = app
        .oneshot(login_request(&credentials(TEST_EMAIL, TEST_PASSWORD)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "code": 408, "message": "Request timeout" })
    );
}

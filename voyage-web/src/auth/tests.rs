//! Tests for the bearer-token guard and identity extraction

use super::*;
use crate::{PasswordCost, WebConfig};
use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let config = WebConfig {
        password_cost: PasswordCost::MINIMUM,
        ..WebConfig::with_secret("guard-test-secret")
    };
    AppState::new(config).await.unwrap()
}

async fn whoami(identity: Identity) -> String {
    identity.user_id.to_string()
}

fn guarded_app(state: AppState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().uri("/whoami");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn test_bearer_token_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
    assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer abc"));
    assert_eq!(bearer_token(&headers), Some("abc"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("abc.def.ghi"));
    assert_eq!(bearer_token(&headers), None);
}

#[tokio::test]
async fn test_valid_token_reaches_handler_with_identity() {
    let state = test_state().await;
    let token = state.tokens.issue(42).unwrap();

    let (status, body) = call(guarded_app(state), Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "42");
}

#[tokio::test]
async fn test_missing_header_rejected() {
    let (status, body) = call(guarded_app(test_state().await), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn test_wrong_scheme_rejected() {
    let state = test_state().await;
    let token = state.tokens.issue(1).unwrap();

    let (status, _) = call(guarded_app(state), Some(&format!("Token {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let (status, _) = call(guarded_app(test_state().await), Some("Bearer garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let state = test_state().await;
    let issued = Utc::now() - Duration::hours(2);
    let token = state.tokens.issue_at(1, issued).unwrap();

    let (status, body) = call(guarded_app(state), Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("expired"));
}

#[tokio::test]
async fn test_token_from_another_secret_rejected() {
    let foreign = jwt::TokenService::new(b"someone-else", Duration::hours(1));
    let token = foreign.issue(1).unwrap();

    let (status, _) = call(
        guarded_app(test_state().await),
        Some(&format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_identity_without_guard_is_unauthorized() {
    let state = test_state().await;
    let app = Router::new().route("/whoami", get(whoami)).with_state(state);

    let (status, _) = call(app, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

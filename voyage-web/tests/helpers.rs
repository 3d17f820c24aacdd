//! Shared integration test harness
//!
//! Drives the full router in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use voyage_web::{create_app, AppState, PasswordCost, WebConfig};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Application under test
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Response status plus parsed JSON body (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// App backed by in-memory stores
    pub async fn spawn() -> Self {
        Self::with_config(test_config()).await
    }

    /// App backed by an in-memory SQLite database
    pub async fn spawn_sqlite() -> Self {
        Self::with_config(WebConfig {
            database_url: Some("sqlite::memory:".to_string()),
            ..test_config()
        })
        .await
    }

    pub async fn with_config(config: WebConfig) -> Self {
        let state = AppState::new(config).await.unwrap();
        Self {
            router: create_app(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    pub async fn signup(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/auth/signup",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    pub async fn signin(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/auth/signin",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Sign up and sign in, returning `(user id, token)`
    pub async fn register_and_login(&self, email: &str, password: &str) -> (i64, String) {
        let signup = self.signup(email, password).await;
        assert_eq!(signup.status, StatusCode::CREATED, "signup failed: {}", signup.body);

        let signin = self.signin(email, password).await;
        assert_eq!(signin.status, StatusCode::OK, "signin failed: {}", signin.body);

        let id = signin.body["id"].as_i64().unwrap();
        let token = signin.body["token"].as_str().unwrap().to_string();
        (id, token)
    }

    pub async fn create_destination(&self, token: &str, body: Value) -> TestResponse {
        self.request("POST", "/destinations", Some(body), Some(token))
            .await
    }
}

pub fn test_config() -> WebConfig {
    WebConfig {
        password_cost: PasswordCost::MINIMUM,
        ..WebConfig::with_secret(TEST_SECRET)
    }
}

/// True if any key or string value in `value` mentions `needle`
pub fn mentions(value: &Value, needle: &str) -> bool {
    value.to_string().to_lowercase().contains(&needle.to_lowercase())
}

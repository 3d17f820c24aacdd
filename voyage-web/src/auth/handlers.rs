//! Signup and signin endpoints

use super::users::{Credentials, SigninResponse, UserInfo};
use crate::error::{ApiError, ApiJson, ErrorBody};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    summary = "Sign up",
    description = "Create an account. The password is stored only as a salted hash.",
    request_body = Credentials,
    responses(
        (status = 201, description = "Account created", body = UserInfo),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<UserInfo>), ApiError> {
    let user = state.user_service.register(credentials).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for an identity token
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "Auth",
    summary = "Sign in",
    request_body = Credentials,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 401, description = "Email or password is incorrect", body = ErrorBody)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<SigninResponse>, ApiError> {
    let response = state.user_service.authenticate(credentials).await?;
    Ok(Json(response))
}

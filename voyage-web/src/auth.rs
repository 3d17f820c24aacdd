//! Authentication: credentials, identity tokens and the request guard

pub mod database;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod users;

#[cfg(test)]
mod tests;

use crate::{error::ApiError, AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use voyage_core::VoyageError;

/// Identity of the caller, established by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
}

/// Read the identity the guard stored in the request extensions
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or_else(|| VoyageError::unauthorized("Authentication required").into())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Middleware that rejects requests without a valid bearer token.
///
/// On success the caller's [`Identity`] is attached to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        debug!("Missing or invalid Authorization header");
        return Err(VoyageError::unauthorized("Missing or invalid Authorization header").into());
    };

    let claims = state.tokens.verify(token)?;
    debug!(user_id = claims.user_id, "Authenticated request");

    request.extensions_mut().insert(Identity {
        user_id: claims.user_id,
    });
    Ok(next.run(request).await)
}

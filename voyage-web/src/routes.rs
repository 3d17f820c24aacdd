//! Route table for the Voyage web server

use crate::{auth, destinations::handlers as destinations, handlers, AppState};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Public signup and signin
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::handlers::signup))
        .route("/auth/signin", post(auth::handlers::signin))
}

/// Destination CRUD; every route requires a bearer token
pub fn destination_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/destinations",
            post(destinations::create_destination).get(destinations::list_my_destinations),
        )
        .route("/destinations/all", get(destinations::list_all_destinations))
        .route(
            "/destinations/{id}",
            get(destinations::get_destination)
                .patch(destinations::update_destination)
                .delete(destinations::delete_destination),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}

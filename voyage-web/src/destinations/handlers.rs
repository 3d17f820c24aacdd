//! Destination endpoints. All of them sit behind the bearer-token guard.

use super::{CreateDestination, Destination, DestinationPatch};
use crate::auth::Identity;
use crate::error::{ApiError, ApiJson, ApiPath, ErrorBody};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};

#[utoipa::path(
    post,
    path = "/destinations",
    tag = "Destinations",
    summary = "Create destination",
    description = "Create a destination owned by the caller. Any owner in the body is ignored.",
    request_body = CreateDestination,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Destination created", body = Destination),
        (status = 400, description = "Invalid travelDate or body", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn create_destination(
    State(state): State<AppState>,
    identity: Identity,
    ApiJson(input): ApiJson<CreateDestination>,
) -> Result<(StatusCode, Json<Destination>), ApiError> {
    let destination = state
        .destination_service
        .create(identity.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(destination)))
}

#[utoipa::path(
    get,
    path = "/destinations/all",
    tag = "Destinations",
    summary = "List all destinations",
    description = "Every destination, whoever owns it. Requires a valid token.",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All destinations", body = [Destination]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_all_destinations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Destination>>, ApiError> {
    Ok(Json(state.destination_service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/destinations",
    tag = "Destinations",
    summary = "List my destinations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's destinations", body = [Destination]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    )
)]
pub async fn list_my_destinations(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Destination>>, ApiError> {
    let destinations = state
        .destination_service
        .list_for_owner(identity.user_id)
        .await?;
    Ok(Json(destinations))
}

#[utoipa::path(
    get,
    path = "/destinations/{id}",
    tag = "Destinations",
    summary = "Get destination",
    params(("id" = i64, Path, description = "Destination id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The destination", body = Destination),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such destination owned by the caller", body = ErrorBody)
    )
)]
pub async fn get_destination(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Destination>, ApiError> {
    let destination = state
        .destination_service
        .find_one(identity.user_id, id)
        .await?;
    Ok(Json(destination))
}

#[utoipa::path(
    patch,
    path = "/destinations/{id}",
    tag = "Destinations",
    summary = "Update destination",
    description = "Apply a partial update. Absent fields keep their value; null clears location or notes.",
    params(("id" = i64, Path, description = "Destination id")),
    request_body = DestinationPatch,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The updated destination", body = Destination),
        (status = 400, description = "Invalid travelDate, null name or travelDate, or bad body", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such destination owned by the caller", body = ErrorBody)
    )
)]
pub async fn update_destination(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<DestinationPatch>,
) -> Result<Json<Destination>, ApiError> {
    let destination = state
        .destination_service
        .update(identity.user_id, id, patch)
        .await?;
    Ok(Json(destination))
}

#[utoipa::path(
    delete,
    path = "/destinations/{id}",
    tag = "Destinations",
    summary = "Delete destination",
    params(("id" = i64, Path, description = "Destination id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The deleted destination", body = Destination),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such destination owned by the caller", body = ErrorBody)
    )
)]
pub async fn delete_destination(
    State(state): State<AppState>,
    identity: Identity,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Destination>, ApiError> {
    let destination = state
        .destination_service
        .remove(identity.user_id, id)
        .await?;
    Ok(Json(destination))
}

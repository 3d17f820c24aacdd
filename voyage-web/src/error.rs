//! HTTP mapping for service errors
//!
//! Every error body has the shape `{"error": "<code>", "message": "<text>"}`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use voyage_core::{ErrorKind, VoyageError};

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable code
    #[schema(example = "not_found")]
    pub error: String,
    pub message: String,
    /// Offending request field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Service error on its way out through the HTTP boundary
#[derive(Debug)]
pub struct ApiError(pub VoyageError);

impl ApiError {
    /// Status code for an error category
    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Config | ErrorKind::Storage | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        Self::status_for(self.0.kind())
    }
}

impl From<VoyageError> for ApiError {
    fn from(error: VoyageError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(VoyageError::validation(rejection.body_text(), None))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(VoyageError::validation(rejection.body_text(), Some("id")))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.0.log();

        let kind = self.0.kind();
        let field = match &self.0 {
            VoyageError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        let body = ErrorBody {
            error: kind.code().to_string(),
            message: self.0.public_message(),
            field,
        };

        (Self::status_for(kind), Json(body)).into_response()
    }
}

//! OpenAPI document for the Voyage API

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::users::{Credentials, SigninResponse, UserInfo};
use crate::destinations::{CreateDestination, Destination, DestinationPatch};
use crate::error::ErrorBody;
use crate::handlers::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Voyage API",
        description = "Accounts with bearer-token sign-in and per-user travel destinations",
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::handlers::health_check,

        crate::auth::handlers::signup,
        crate::auth::handlers::signin,

        crate::destinations::handlers::create_destination,
        crate::destinations::handlers::list_all_destinations,
        crate::destinations::handlers::list_my_destinations,
        crate::destinations::handlers::get_destination,
        crate::destinations::handlers::update_destination,
        crate::destinations::handlers::delete_destination,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            Credentials,
            UserInfo,
            SigninResponse,
            Destination,
            CreateDestination,
            DestinationPatch,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Signup and signin"),
        (name = "Destinations", description = "Destinations owned by the signed-in user"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by guarded operations
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Get the OpenAPI document as JSON
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

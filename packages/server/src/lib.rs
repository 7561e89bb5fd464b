pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Portal API",
        version = "1.0.0",
        description = "Hackathon registration and placement feedback for the college portal"
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Admin Events", description = "Event management for administrators"),
        (name = "Problem Statements", description = "Problem statements attached to events"),
        (name = "Hackathons", description = "Atomic creation of an event with its problem statements"),
        (name = "Settings", description = "Global portal settings"),
        (name = "Feedback Tasks", description = "Placement drives and collected feedback"),
        (name = "Student Events", description = "Event browser for students"),
        (name = "Teams", description = "Team registration, invitations and problem statement choice"),
        (name = "Invitations", description = "Invitations addressed to the caller"),
        (name = "Profile", description = "The caller's profile"),
        (name = "Feedback", description = "Interview feedback drafts and submissions"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
}

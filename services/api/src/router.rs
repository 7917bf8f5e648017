//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, FollowUpRequest, FollowUpResponse, HealthResponse},
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Survey Agent API",
        description = "HTTP surface that exposes the follow-up recommendation agent."
    ),
    paths(handlers::health, handlers::decide_follow_up),
    components(schemas(FollowUpRequest, FollowUpResponse, HealthResponse, ErrorResponse)),
    tags(
        (name = "system", description = "Liveness and readiness probes"),
        (name = "followups", description = "Follow-up question decisions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/surveys/followups/decide",
            post(handlers::decide_follow_up),
        )
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}

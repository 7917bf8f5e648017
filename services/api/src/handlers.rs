//! Axum Handlers for the REST API
//!
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use followup_core::{FollowUpError, FollowUpErrorKind};
use std::sync::Arc;
use tracing::{error, warn};

use crate::{
    models::{ErrorResponse, FollowUpRequest, FollowUpResponse, HealthResponse},
    state::AppState,
};

pub const UNAVAILABLE_MESSAGE: &str = "Follow-up agent is unavailable.";

pub enum ApiError {
    BadRequest(String),
    /// The request body failed extraction or field validation.
    InvalidBody(StatusCode, String),
    BadGateway(FollowUpError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { detail })).into_response()
            }
            ApiError::InvalidBody(status, detail) => {
                (status, Json(ErrorResponse { detail })).into_response()
            }
            ApiError::BadGateway(err) => {
                error!(error = %err, "Follow-up agent failed");
                let detail = UNAVAILABLE_MESSAGE.to_string();
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse { detail })).into_response()
            }
        }
    }
}

impl From<FollowUpError> for ApiError {
    fn from(err: FollowUpError) -> Self {
        match err.kind() {
            FollowUpErrorKind::InvalidInput => ApiError::BadRequest(err.to_string()),
            FollowUpErrorKind::Backend => ApiError::BadGateway(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.status(), rejection.body_text())
    }
}

/// Simple readiness endpoint used for container health checks.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Return whether a follow-up question should be asked.
#[utoipa::path(
    post,
    path = "/surveys/followups/decide",
    tag = "followups",
    request_body = FollowUpRequest,
    responses(
        (status = 200, description = "Follow-up recommendation", body = FollowUpResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 422, description = "Request body failed validation", body = ErrorResponse),
        (status = 502, description = "Follow-up agent unavailable", body = ErrorResponse)
    )
)]
pub async fn decide_follow_up(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FollowUpRequest>, JsonRejection>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let Json(payload) = payload?;

    if let Some(field) = payload.empty_field() {
        warn!(field, "Rejected follow-up request with empty field");
        return Err(ApiError::InvalidBody(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{field}: must be at least 1 character long"),
        ));
    }

    let recommendation = state
        .followup_service
        .decide(&payload.question, &payload.response)
        .await?;

    Ok(Json(recommendation.into()))
}

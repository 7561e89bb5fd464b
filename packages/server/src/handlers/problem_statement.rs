use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::problem_statement;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::problem_statement::*;
use crate::state::AppState;
use crate::utils::event::find_event_for_update;

#[utoipa::path(
    post,
    path = "/problem-statements",
    tag = "Problem Statements",
    operation_id = "createProblemStatement",
    summary = "Attach a problem statement to an event",
    description = "Creates a problem statement under `eventId`. `maxTeams` is coerced to at least 1 and defaults to 1. Requires `problem_statement:manage`.",
    request_body = CreateProblemStatementRequest,
    responses(
        (status = 201, description = "Problem statement created", body = ProblemStatementResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(event_id = payload.event_id))]
pub async fn create_problem_statement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProblemStatementRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("problem_statement:manage")?;
    validate_create_problem_statement(&payload)?;

    let max_teams = payload.effective_max_teams();

    // Lock the event so a concurrent delete cannot orphan the new row.
    let txn = state.db.begin().await?;
    find_event_for_update(&txn, payload.event_id).await?;

    let model = problem_statement::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        max_teams: Set(max_teams),
        event_id: Set(payload.event_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        problem_statement_id = model.id,
        event_id = model.event_id,
        max_teams,
        "Problem statement created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ProblemStatementResponse::from_model(model, 0)),
    ))
}

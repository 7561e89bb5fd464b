use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{event, problem_statement};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::event::EventResponse;
use crate::models::hackathon::*;
use crate::models::problem_statement::ProblemStatementResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/hackathons",
    tag = "Hackathons",
    operation_id = "createHackathon",
    summary = "Create an event with its problem statements atomically",
    description = "Validates the whole form, then inserts the event and every filled problem statement in a single transaction. Rows with an empty title or description are dropped; team limits below 1 become 1. Either everything is created or nothing is. Requires `event:manage` and `problem_statement:manage`.",
    request_body = CreateHackathonRequest,
    responses(
        (status = 201, description = "Hackathon created", body = HackathonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_hackathon(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHackathonRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_all_permissions(&["event:manage", "problem_statement:manage"])?;
    let valid = validate_create_hackathon(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let event = event::ActiveModel {
        name: Set(valid.name),
        description: Set(payload.description.trim().to_string()),
        start_date: Set(valid.start_date),
        end_date: Set(valid.end_date),
        venue: Set(payload
            .venue
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())),
        registration_deadline: Set(payload.registration_deadline),
        max_team_size: Set(payload.max_team_size),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut problem_statements = Vec::with_capacity(valid.problem_statements.len());
    for ps in valid.problem_statements {
        let model = problem_statement::ActiveModel {
            title: Set(ps.title),
            description: Set(ps.description),
            max_teams: Set(ps.max_teams),
            event_id: Set(event.id),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        problem_statements.push(ProblemStatementResponse::from_model(model, 0));
    }

    txn.commit().await?;

    tracing::info!(
        event_id = event.id,
        problem_statements = problem_statements.len(),
        "Hackathon created"
    );

    Ok((
        StatusCode::CREATED,
        Json(HackathonResponse {
            event: EventResponse::from_model(event, now),
            problem_statements,
        }),
    ))
}

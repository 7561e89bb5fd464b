use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::FeedbackStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{feedback, feedback_task, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::feedback::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/feedback-tasks",
    tag = "Feedback Tasks",
    operation_id = "createFeedbackTask",
    summary = "Open a feedback task for a placement drive",
    request_body = CreateFeedbackTaskRequest,
    responses(
        (status = 201, description = "Task created", body = FeedbackTaskResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_feedback_task(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFeedbackTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("feedback:manage")?;
    validate_create_feedback_task(&payload)?;

    let model = feedback_task::ActiveModel {
        company_name: Set(payload.company_name.trim().to_string()),
        description: Set(payload
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())),
        drive_date: Set(payload.drive_date),
        deadline: Set(payload.deadline),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(task_id = model.id, company = %model.company_name, "Feedback task created");

    Ok((StatusCode::CREATED, Json(FeedbackTaskResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/feedback-tasks",
    tag = "Feedback Tasks",
    operation_id = "listFeedbackTasks",
    summary = "List feedback tasks with draft and submission counts",
    responses(
        (status = 200, description = "Tasks", body = Vec<AdminFeedbackTaskItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_feedback_tasks(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminFeedbackTaskItem>>, AppError> {
    auth_user.require_permission("feedback:manage")?;

    let tasks = feedback_task::Entity::find()
        .order_by_desc(feedback_task::Column::CreatedAt)
        .order_by_desc(feedback_task::Column::Id)
        .all(&state.db)
        .await?;

    let rows: Vec<(i32, FeedbackStatus, i64)> = feedback::Entity::find()
        .select_only()
        .column(feedback::Column::TaskId)
        .column(feedback::Column::Status)
        .column_as(feedback::Column::UserId.count(), "response_count")
        .group_by(feedback::Column::TaskId)
        .group_by(feedback::Column::Status)
        .into_tuple()
        .all(&state.db)
        .await?;

    let mut counts: HashMap<i32, (u64, u64)> = HashMap::new();
    for (task_id, status, count) in rows {
        let entry = counts.entry(task_id).or_default();
        match status {
            FeedbackStatus::Submitted => entry.1 += Ord::max(count, 0) as u64,
            _ => entry.0 += Ord::max(count, 0) as u64,
        }
    }

    let items = tasks
        .into_iter()
        .map(|t| {
            let (draft_count, submitted_count) = counts.get(&t.id).copied().unwrap_or_default();
            AdminFeedbackTaskItem {
                task: t.into(),
                draft_count,
                submitted_count,
            }
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/feedback-tasks/{id}/responses",
    tag = "Feedback Tasks",
    operation_id = "listFeedbackResponses",
    summary = "List students' responses to a feedback task",
    description = "Returns every stored response (drafts and submissions), submitted first.",
    params(("id" = i32, Path, description = "Feedback task ID")),
    responses(
        (status = 200, description = "Responses", body = Vec<FeedbackResponseItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_feedback_responses(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<FeedbackResponseItem>>, AppError> {
    auth_user.require_permission("feedback:manage")?;

    feedback_task::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback task not found".into()))?;

    let rows = feedback::Entity::find()
        .filter(feedback::Column::TaskId.eq(id))
        .find_also_related(user::Entity)
        .order_by_desc(feedback::Column::SubmittedAt)
        .order_by_asc(feedback::Column::UserId)
        .all(&state.db)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (row, usr) in rows {
        let (username, full_name) = usr.map(|u| (u.username, u.full_name)).unwrap_or_default();
        items.push(FeedbackResponseItem {
            user_id: row.user_id,
            username,
            full_name,
            status: row.status,
            rounds: decode_rounds(row.rounds)?,
            overall_experience: row.overall_experience,
            additional_comments: row.additional_comments,
            submitted_at: row.submitted_at,
        });
    }
    items.sort_by_key(|item| item.status != FeedbackStatus::Submitted);

    Ok(Json(items))
}

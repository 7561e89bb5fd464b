use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use common::{FeedbackForm, FeedbackStatus};
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{feedback, feedback_task};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::feedback::*;
use crate::state::AppState;

async fn find_task<C: ConnectionTrait>(db: &C, id: i32) -> Result<feedback_task::Model, AppError> {
    feedback_task::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Feedback task not found".into()))
}

#[utoipa::path(
    get,
    path = "/feedback-tasks",
    tag = "Feedback",
    operation_id = "listMyFeedbackTasks",
    summary = "List feedback tasks with the caller's status",
    description = "Every task with the caller's status: `pending` when nothing was saved yet, otherwise `draft` or `submitted`.",
    responses(
        (status = 200, description = "Tasks", body = Vec<StudentFeedbackTaskItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_my_feedback_tasks(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentFeedbackTaskItem>>, AppError> {
    auth_user.require_permission("feedback:respond")?;

    let tasks = feedback_task::Entity::find()
        .order_by_desc(feedback_task::Column::CreatedAt)
        .order_by_desc(feedback_task::Column::Id)
        .all(&state.db)
        .await?;

    let statuses: HashMap<i32, FeedbackStatus> = feedback::Entity::find()
        .filter(feedback::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(feedback::Column::TaskId)
        .column(feedback::Column::Status)
        .into_tuple::<(i32, FeedbackStatus)>()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();

    let items = tasks
        .into_iter()
        .map(|t| StudentFeedbackTaskItem {
            status: statuses.get(&t.id).copied().unwrap_or_default(),
            task: t.into(),
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/feedback/{taskId}",
    tag = "Feedback",
    operation_id = "getMyFeedback",
    summary = "Get the caller's feedback for a task",
    params(("taskId" = i32, Path, description = "Feedback task ID")),
    responses(
        (status = 200, description = "Feedback (empty and pending if never saved)", body = FeedbackResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(task_id, user_id = auth_user.user_id))]
pub async fn get_my_feedback(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<FeedbackResponse>, AppError> {
    auth_user.require_permission("feedback:respond")?;

    let task = find_task(&state.db, task_id).await?;
    let row = feedback::Entity::find_by_id((task_id, auth_user.user_id))
        .one(&state.db)
        .await?;

    Ok(Json(FeedbackResponse::new(task, row)?))
}

#[utoipa::path(
    put,
    path = "/feedback/{taskId}",
    tag = "Feedback",
    operation_id = "saveMyFeedback",
    summary = "Save a draft or submit feedback",
    description = "With `isSubmitted: false` the feedback is stored as a draft without validation. With `isSubmitted: true` it must have at least one round and every round a name; it then becomes read-only. Round numbers are rewritten to their positions on every save.",
    params(("taskId" = i32, Path, description = "Feedback task ID")),
    request_body = SaveFeedbackRequest,
    responses(
        (status = 200, description = "Saved", body = FeedbackResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Task not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already submitted (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(task_id, user_id = auth_user.user_id, submit = payload.is_submitted)
)]
pub async fn save_my_feedback(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    AppJson(payload): AppJson<SaveFeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    auth_user.require_permission("feedback:respond")?;
    validate_feedback_shape(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let task = find_task(&txn, task_id).await?;

    let existing = feedback::Entity::find_by_id((task_id, auth_user.user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let current = existing
        .as_ref()
        .map(|row| row.status)
        .unwrap_or_default();

    let mut form = FeedbackForm::from_parts(
        payload.rounds,
        payload.overall_experience,
        payload.additional_comments,
        current,
    );
    if payload.is_submitted {
        form.submit()?;
    } else {
        form.save_draft()?;
    }

    if let Some(deadline) = task.deadline
        && now > deadline
    {
        return Err(AppError::Validation(
            "Feedback deadline has passed".into(),
        ));
    }

    let rounds = encode_rounds(form.rounds())?;
    let submitted_at = (form.status() == FeedbackStatus::Submitted).then_some(now);

    let row = match existing {
        Some(row) => {
            let mut active: feedback::ActiveModel = row.into();
            active.rounds = Set(rounds);
            active.overall_experience = Set(form.overall_experience());
            active.additional_comments = Set(form.additional_comments().to_string());
            active.status = Set(form.status());
            active.updated_at = Set(now);
            active.submitted_at = Set(submitted_at);
            active.update(&txn).await?
        }
        None => feedback::ActiveModel {
            task_id: Set(task_id),
            user_id: Set(auth_user.user_id),
            rounds: Set(rounds),
            overall_experience: Set(form.overall_experience()),
            additional_comments: Set(form.additional_comments().to_string()),
            status: Set(form.status()),
            updated_at: Set(now),
            submitted_at: Set(submitted_at),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Feedback was saved concurrently, retry".into())
            }
            _ => AppError::from(e),
        })?,
    };

    txn.commit().await?;

    if row.status == FeedbackStatus::Submitted {
        tracing::info!(task_id, user_id = auth_user.user_id, "Feedback submitted");
    }

    Ok(Json(FeedbackResponse::new(task, Some(row))?))
}

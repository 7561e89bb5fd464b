use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::EventStatus;
use common::hackathon::validate_time_range;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{event, problem_statement, team, team_invitation, team_member};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::event::*;
use crate::models::shared::escape_like;
use crate::state::AppState;
use crate::utils::event::{
    count_by_event, find_event, find_event_for_update, problem_statements_for_event,
};
use crate::utils::team::team_responses;

#[utoipa::path(
    post,
    path = "/events",
    tag = "Admin Events",
    operation_id = "createEvent",
    summary = "Create a hackathon event",
    description = "Creates an event. Requires `event:manage`. Rejected with `missing required fields` when name or either timestamp is absent, and with `invalid time range` when start is not strictly before end.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventEnvelope),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;
    let valid = validate_create_event(&payload)?;

    let now = chrono::Utc::now();
    let model = event::ActiveModel {
        name: Set(valid.name),
        description: Set(payload.description.trim().to_string()),
        start_date: Set(valid.start_date),
        end_date: Set(valid.end_date),
        venue: Set(payload.venue.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())),
        registration_deadline: Set(payload.registration_deadline),
        max_team_size: Set(payload.max_team_size),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(event_id = model.id, name = %model.name, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(EventEnvelope {
            event: EventResponse::from_model(model, now),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "Admin Events",
    operation_id = "listEvents",
    summary = "List all events with team and problem statement counts",
    description = "Returns every event, newest start first, with derived status, `teamCount` and `problemStatementCount`. Requires `event:manage`.",
    params(EventListQuery),
    responses(
        (status = 200, description = "Events", body = Vec<AdminEventListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<AdminEventListItem>>, AppError> {
    auth_user.require_permission("event:manage")?;

    let now = chrono::Utc::now();
    let mut select = event::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(event::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(status) = query.status {
        select = filter_by_status(select, status, now);
    }

    let events = select
        .order_by_desc(event::Column::StartDate)
        .order_by_desc(event::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = events.iter().map(|e| e.id).collect();
    let team_counts =
        count_by_event::<team::Entity, _>(&state.db, team::Column::EventId, ids.clone()).await?;
    let ps_counts = count_by_event::<problem_statement::Entity, _>(
        &state.db,
        problem_statement::Column::EventId,
        ids,
    )
    .await?;

    let items = events
        .into_iter()
        .map(|e| {
            let id = e.id;
            AdminEventListItem {
                event: EventResponse::from_model(e, now),
                team_count: team_counts.get(&id).copied().unwrap_or(0),
                problem_statement_count: ps_counts.get(&id).copied().unwrap_or(0),
            }
        })
        .collect();

    Ok(Json(items))
}

/// Translate a derived status into the equivalent time-window predicate.
pub(crate) fn filter_by_status(
    select: Select<event::Entity>,
    status: EventStatus,
    now: chrono::DateTime<chrono::Utc>,
) -> Select<event::Entity> {
    match status {
        EventStatus::Upcoming => select.filter(event::Column::StartDate.gt(now)),
        EventStatus::Ongoing => select
            .filter(event::Column::StartDate.lte(now))
            .filter(event::Column::EndDate.gte(now)),
        EventStatus::Past => select.filter(event::Column::EndDate.lt(now)),
    }
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Admin Events",
    operation_id = "getEvent",
    summary = "Get an event with its teams and problem statements",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = AdminEventDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AdminEventDetailResponse>, AppError> {
    auth_user.require_permission("event:manage")?;

    let model = find_event(&state.db, id).await?;
    let teams = team::Entity::find()
        .filter(team::Column::EventId.eq(id))
        .order_by_asc(team::Column::CreatedAt)
        .all(&state.db)
        .await?;
    let teams = team_responses(&state.db, teams).await?;
    let problem_statements = problem_statements_for_event(&state.db, id).await?;

    Ok(Json(AdminEventDetailResponse {
        event: model.into(),
        teams,
        problem_statements,
    }))
}

#[utoipa::path(
    patch,
    path = "/events/{id}",
    tag = "Admin Events",
    operation_id = "updateEvent",
    summary = "Update an event",
    description = "Partially updates an event using PATCH semantics. Cross-field validation keeps start before end and the registration deadline within the event. Changing `maxTeamSize` does not resize existing teams.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    auth_user.require_permission("event:manage")?;
    validate_update_event(&payload)?;

    if payload == UpdateEventRequest::default() {
        let existing = find_event(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_event_for_update(&txn, id).await?;

    let effective_start = payload.start_date.unwrap_or(existing.start_date);
    let effective_end = payload.end_date.unwrap_or(existing.end_date);
    validate_time_range(effective_start, effective_end)?;
    let effective_deadline = payload
        .registration_deadline
        .unwrap_or(existing.registration_deadline);
    validate_event_extras(effective_end, effective_deadline, None, None)?;

    let mut active: event::ActiveModel = existing.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(venue) = payload.venue {
        active.venue = Set(venue.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()));
    }
    if let Some(deadline) = payload.registration_deadline {
        active.registration_deadline = Set(deadline);
    }
    if let Some(size) = payload.max_team_size {
        active.max_team_size = Set(size);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    tag = "Admin Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    description = "Permanently deletes an event together with its problem statements, teams, memberships and invitations.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:manage")?;

    let txn = state.db.begin().await?;
    find_event_for_update(&txn, id).await?;

    team_invitation::Entity::delete_many()
        .filter(team_invitation::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    team_member::Entity::delete_many()
        .filter(team_member::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    team::Entity::delete_many()
        .filter(team::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    problem_statement::Entity::delete_many()
        .filter(problem_statement::Column::EventId.eq(id))
        .exec(&txn)
        .await?;
    event::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(event_id = id, user_id = auth_user.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

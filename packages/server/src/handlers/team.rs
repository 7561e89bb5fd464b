use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::team_size::ensure_room;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::team_invitation::InvitationStatus;
use crate::entity::{problem_statement, role, team, team_invitation, team_member, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::team::*;
use crate::state::AppState;
use crate::utils::event::{ensure_registration_open, find_event, find_event_for_update};
use crate::utils::settings::load_team_size;
use crate::utils::team::{
    ensure_leader, find_membership, find_team_for_update, invitation_responses, member_count,
    team_response,
};

#[utoipa::path(
    post,
    path = "/events/{id}/teams",
    tag = "Teams",
    operation_id = "createTeam",
    summary = "Create a team for an event",
    description = "The caller becomes leader and first member. The team's size limit is the event's `maxTeamSize` if set, otherwise the global team size; it is captured on the team together with the setting version.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error or registration closed (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already in a team or name taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn create_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:participate")?;
    validate_create_team(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let event = find_event_for_update(&txn, id).await?;
    ensure_registration_open(&event, now)?;

    if find_membership(&txn, id, auth_user.user_id).await?.is_some() {
        return Err(AppError::Conflict(
            "You already belong to a team for this event".into(),
        ));
    }

    let setting = load_team_size(&txn, state.config.portal.default_team_size).await?;
    let limit = setting.effective_for(event.max_team_size);

    let team = team::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        event_id: Set(id),
        leader_id: Set(auth_user.user_id),
        max_size: Set(limit.max_size),
        config_version: Set(limit.config_version),
        problem_statement_id: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A team with this name already exists for this event".into())
        }
        _ => AppError::from(e),
    })?;

    team_member::ActiveModel {
        event_id: Set(id),
        user_id: Set(auth_user.user_id),
        team_id: Set(team.id),
        joined_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let response = team_response(&txn, team).await?;
    txn.commit().await?;

    tracing::info!(
        team_id = response.id,
        event_id = id,
        max_size = response.max_size,
        config_version = ?response.config_version,
        "Team created"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/teams/{id}/invitations",
    tag = "Teams",
    operation_id = "inviteMember",
    summary = "Invite a student to the caller's team",
    description = "Only the team leader may invite. The invitee must be a student without a team for the event, and the team must have room.",
    params(("id" = i32, Path, description = "Team ID")),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Invitation sent", body = InvitationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the team leader (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Invitee already in a team, already invited, or team full (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, invitee = %payload.username))]
pub async fn invite_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<InviteMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("event:participate")?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let team = find_team_for_update(&txn, id).await?;
    ensure_leader(&team, auth_user.user_id)?;

    let event = find_event(&txn, team.event_id).await?;
    ensure_registration_open(&event, now)?;

    let invitee = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    if invitee.id == auth_user.user_id {
        return Err(AppError::Validation("You cannot invite yourself".into()));
    }
    if invitee.role != role::DEFAULT_ROLE {
        return Err(AppError::Validation("Only students can be invited".into()));
    }
    if find_membership(&txn, team.event_id, invitee.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "User already belongs to a team for this event".into(),
        ));
    }

    let already_invited = team_invitation::Entity::find()
        .filter(team_invitation::Column::TeamId.eq(team.id))
        .filter(team_invitation::Column::InviteeId.eq(invitee.id))
        .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
        .count(&txn)
        .await?;
    if already_invited > 0 {
        return Err(AppError::Conflict("Invitation already pending".into()));
    }

    ensure_room(member_count(&txn, team.id).await?, team.max_size)?;

    let invitation = team_invitation::ActiveModel {
        team_id: Set(team.id),
        event_id: Set(team.event_id),
        invitee_id: Set(invitee.id),
        invited_by: Set(auth_user.user_id),
        status: Set(InvitationStatus::Pending),
        created_at: Set(now),
        responded_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let response = invitation_responses(&txn, vec![invitation])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Invitation response missing".into()))?;
    txn.commit().await?;

    tracing::info!(
        invitation_id = response.id,
        team_id = team.id,
        invitee_id = invitee.id,
        "Invitation sent"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/teams/{id}/problem-statement",
    tag = "Teams",
    operation_id = "selectProblemStatement",
    summary = "Choose the team's problem statement",
    description = "Only the team leader may choose. The statement must belong to the team's event and have fewer than `maxTeams` teams; capacity is checked under a row lock.",
    params(("id" = i32, Path, description = "Team ID")),
    request_body = SelectProblemStatementRequest,
    responses(
        (status = 200, description = "Selection stored", body = TeamResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the team leader (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or problem statement not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Problem statement is full (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(
    skip(state, auth_user, payload),
    fields(id, problem_statement_id = payload.problem_statement_id)
)]
pub async fn select_problem_statement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SelectProblemStatementRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    auth_user.require_permission("event:participate")?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let team = find_team_for_update(&txn, id).await?;
    ensure_leader(&team, auth_user.user_id)?;

    let event = find_event(&txn, team.event_id).await?;
    ensure_registration_open(&event, now)?;

    let statement = problem_statement::Entity::find_by_id(payload.problem_statement_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem statement not found".into()))?;
    if statement.event_id != team.event_id {
        return Err(AppError::Validation(
            "Problem statement belongs to a different event".into(),
        ));
    }

    if team.problem_statement_id == Some(statement.id) {
        let response = team_response(&txn, team).await?;
        txn.commit().await?;
        return Ok(Json(response));
    }

    let taken = team::Entity::find()
        .filter(team::Column::ProblemStatementId.eq(statement.id))
        .count(&txn)
        .await?;
    if taken >= Ord::max(statement.max_teams, 0) as u64 {
        return Err(AppError::Conflict("Problem statement is full".into()));
    }

    let mut active: team::ActiveModel = team.into();
    active.problem_statement_id = Set(Some(statement.id));
    let team = active.update(&txn).await?;

    let response = team_response(&txn, team).await?;
    txn.commit().await?;

    tracing::info!(
        team_id = id,
        problem_statement_id = statement.id,
        "Problem statement selected"
    );

    Ok(Json(response))
}

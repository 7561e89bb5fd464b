use axum::Json;
use axum::extract::{Path, State};
use common::team_size::ensure_room;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::instrument;

use crate::entity::team_invitation::{self, InvitationStatus};
use crate::entity::team_member;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::team::{InvitationResponse, TeamResponse};
use crate::state::AppState;
use crate::utils::event::{ensure_registration_open, find_event};
use crate::utils::team::{
    find_membership, find_team_for_update, invitation_responses, member_count, team_response,
};

/// Lock a pending invitation addressed to `user_id`.
async fn find_pending_invitation(
    txn: &DatabaseTransaction,
    id: i32,
    user_id: i32,
) -> Result<team_invitation::Model, AppError> {
    let invitation = team_invitation::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .filter(|inv| inv.invitee_id == user_id)
        .ok_or_else(|| AppError::NotFound("Invitation not found".into()))?;
    if invitation.status != InvitationStatus::Pending {
        return Err(AppError::Conflict("Invitation was already answered".into()));
    }
    Ok(invitation)
}

#[utoipa::path(
    get,
    path = "/invitations",
    tag = "Invitations",
    operation_id = "listInvitations",
    summary = "List pending invitations addressed to the caller",
    responses(
        (status = 200, description = "Pending invitations", body = Vec<InvitationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_invitations(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<InvitationResponse>>, AppError> {
    auth_user.require_permission("event:participate")?;

    let invitations = team_invitation::Entity::find()
        .filter(team_invitation::Column::InviteeId.eq(auth_user.user_id))
        .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
        .order_by_desc(team_invitation::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(invitation_responses(&state.db, invitations).await?))
}

#[utoipa::path(
    post,
    path = "/invitations/{id}/accept",
    tag = "Invitations",
    operation_id = "acceptInvitation",
    summary = "Accept an invitation and join the team",
    description = "Joins the team if it still has room and the caller has no team for the event. Other pending invitations for the same event are declined.",
    params(("id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Joined team", body = TeamResponse),
        (status = 400, description = "Registration closed (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invitation not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already answered, already in a team, or team full (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn accept_invitation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamResponse>, AppError> {
    auth_user.require_permission("event:participate")?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;
    let invitation = find_pending_invitation(&txn, id, auth_user.user_id).await?;
    let team = find_team_for_update(&txn, invitation.team_id).await?;

    let event = find_event(&txn, team.event_id).await?;
    ensure_registration_open(&event, now)?;

    if find_membership(&txn, team.event_id, auth_user.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "You already belong to a team for this event".into(),
        ));
    }
    ensure_room(member_count(&txn, team.id).await?, team.max_size)?;

    team_member::ActiveModel {
        event_id: Set(team.event_id),
        user_id: Set(auth_user.user_id),
        team_id: Set(team.id),
        joined_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("You already belong to a team for this event".into())
        }
        _ => AppError::from(e),
    })?;

    let mut active: team_invitation::ActiveModel = invitation.into();
    active.status = Set(InvitationStatus::Accepted);
    active.responded_at = Set(Some(now));
    active.update(&txn).await?;

    team_invitation::Entity::update_many()
        .col_expr(
            team_invitation::Column::Status,
            Expr::value(InvitationStatus::Declined),
        )
        .col_expr(team_invitation::Column::RespondedAt, Expr::value(Some(now)))
        .filter(team_invitation::Column::InviteeId.eq(auth_user.user_id))
        .filter(team_invitation::Column::EventId.eq(team.event_id))
        .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
        .exec(&txn)
        .await?;

    let response = team_response(&txn, team).await?;
    txn.commit().await?;

    tracing::info!(
        invitation_id = id,
        team_id = response.id,
        user_id = auth_user.user_id,
        "Invitation accepted"
    );

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/invitations/{id}/decline",
    tag = "Invitations",
    operation_id = "declineInvitation",
    summary = "Decline an invitation",
    params(("id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Invitation declined", body = InvitationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Invitation not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already answered (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn decline_invitation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InvitationResponse>, AppError> {
    auth_user.require_permission("event:participate")?;

    let txn = state.db.begin().await?;
    let invitation = find_pending_invitation(&txn, id, auth_user.user_id).await?;

    let mut active: team_invitation::ActiveModel = invitation.into();
    active.status = Set(InvitationStatus::Declined);
    active.responded_at = Set(Some(chrono::Utc::now()));
    let invitation = active.update(&txn).await?;

    let response = invitation_responses(&txn, vec![invitation])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Invitation response missing".into()))?;
    txn.commit().await?;

    Ok(Json(response))
}

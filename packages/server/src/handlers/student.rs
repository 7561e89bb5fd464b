use std::collections::{HashMap, HashSet};

use axum::Json;
use axum::extract::{Path, State};
use common::FeedbackStatus;
use sea_orm::*;
use tracing::instrument;

use crate::entity::team_invitation::InvitationStatus;
use crate::entity::{event, feedback, feedback_task, team, team_invitation, team_member, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::event::EventResponse;
use crate::models::student::*;
use crate::state::AppState;
use crate::utils::event::{find_event, problem_statements_for_event};
use crate::utils::team::{find_membership, find_team, team_response};

#[utoipa::path(
    get,
    path = "/events",
    tag = "Student Events",
    operation_id = "listOpenEvents",
    summary = "List upcoming and ongoing events",
    description = "Events that have not ended, soonest first, with the caller's registration state and pending invitation count.",
    responses(
        (status = 200, description = "Events", body = Vec<StudentEventItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_open_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentEventItem>>, AppError> {
    auth_user.require_permission("event:participate")?;

    let now = chrono::Utc::now();
    let events = event::Entity::find()
        .filter(event::Column::EndDate.gte(now))
        .order_by_asc(event::Column::StartDate)
        .order_by_asc(event::Column::Id)
        .all(&state.db)
        .await?;

    let registered: HashSet<i32> = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(auth_user.user_id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| m.event_id)
        .collect();

    let mut pending: HashMap<i32, u64> = HashMap::new();
    for inv in team_invitation::Entity::find()
        .filter(team_invitation::Column::InviteeId.eq(auth_user.user_id))
        .filter(team_invitation::Column::Status.eq(InvitationStatus::Pending))
        .all(&state.db)
        .await?
    {
        *pending.entry(inv.event_id).or_default() += 1;
    }

    let items = events
        .into_iter()
        .map(|e| {
            let id = e.id;
            StudentEventItem {
                event: EventResponse::from_model(e, now),
                is_registered: registered.contains(&id),
                pending_invitations: pending.get(&id).copied().unwrap_or(0),
            }
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "Student Events",
    operation_id = "getOpenEvent",
    summary = "Event details with the caller's team",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = StudentEventDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn get_open_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentEventDetailResponse>, AppError> {
    auth_user.require_permission("event:participate")?;

    let model = find_event(&state.db, id).await?;
    let my_team = match find_membership(&state.db, id, auth_user.user_id).await? {
        Some(membership) => {
            let team = find_team(&state.db, membership.team_id).await?;
            Some(team_response(&state.db, team).await?)
        }
        None => None,
    };
    let problem_statements = problem_statements_for_event(&state.db, id).await?;

    Ok(Json(StudentEventDetailResponse {
        event: model.into(),
        is_registered: my_team.is_some(),
        my_team,
        problem_statements,
    }))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    operation_id = "getProfile",
    summary = "The caller's profile, teams and open feedback tasks",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let me = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let memberships = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(me.id))
        .find_also_related(team::Entity)
        .order_by_desc(team_member::Column::JoinedAt)
        .all(&state.db)
        .await?;

    let event_ids: Vec<i32> = memberships.iter().map(|(m, _)| m.event_id).collect();
    let event_names: HashMap<i32, String> = if event_ids.is_empty() {
        HashMap::new()
    } else {
        event::Entity::find()
            .filter(event::Column::Id.is_in(event_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect()
    };

    let teams = memberships
        .into_iter()
        .filter_map(|(m, t)| {
            let t = t?;
            Some(ProfileTeamItem {
                team_id: t.id,
                team_name: t.name,
                event_id: m.event_id,
                event_name: event_names.get(&m.event_id).cloned().unwrap_or_default(),
                is_leader: t.leader_id == me.id,
            })
        })
        .collect();

    let total_tasks = feedback_task::Entity::find().count(&state.db).await?;
    let submitted = feedback::Entity::find()
        .filter(feedback::Column::UserId.eq(me.id))
        .filter(feedback::Column::Status.eq(FeedbackStatus::Submitted))
        .count(&state.db)
        .await?;

    Ok(Json(ProfileResponse {
        id: me.id,
        username: me.username,
        email: me.email,
        full_name: me.full_name,
        role: me.role,
        teams,
        open_feedback_tasks: total_tasks.saturating_sub(submitted),
    }))
}

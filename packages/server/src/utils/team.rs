use std::collections::HashMap;

use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::{event, team, team_invitation, team_member, user};
use crate::error::AppError;
use crate::models::team::{InvitationResponse, TeamMemberResponse, TeamResponse};

/// The caller's membership in an event, if any.
pub async fn find_membership<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
    user_id: i32,
) -> Result<Option<team_member::Model>, AppError> {
    Ok(team_member::Entity::find_by_id((event_id, user_id))
        .one(db)
        .await?)
}

pub async fn find_team<C: ConnectionTrait>(db: &C, id: i32) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

pub async fn find_team_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

pub async fn member_count<C: ConnectionTrait>(db: &C, team_id: i32) -> Result<u64, AppError> {
    Ok(team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .count(db)
        .await?)
}

/// Build responses for several teams with one member query.
pub async fn team_responses<C: ConnectionTrait>(
    db: &C,
    teams: Vec<team::Model>,
) -> Result<Vec<TeamResponse>, AppError> {
    if teams.is_empty() {
        return Ok(Vec::new());
    }
    let team_ids: Vec<i32> = teams.iter().map(|t| t.id).collect();
    let leaders: HashMap<i32, i32> = teams.iter().map(|t| (t.id, t.leader_id)).collect();

    let rows = team_member::Entity::find()
        .filter(team_member::Column::TeamId.is_in(team_ids))
        .find_also_related(user::Entity)
        .order_by_asc(team_member::Column::JoinedAt)
        .all(db)
        .await?;

    let mut members: HashMap<i32, Vec<TeamMemberResponse>> = HashMap::new();
    for (tm, usr) in rows {
        let (username, full_name) = usr
            .map(|u| (u.username, u.full_name))
            .unwrap_or_default();
        members.entry(tm.team_id).or_default().push(TeamMemberResponse {
            user_id: tm.user_id,
            username,
            full_name,
            is_leader: leaders.get(&tm.team_id) == Some(&tm.user_id),
            joined_at: tm.joined_at,
        });
    }

    Ok(teams
        .into_iter()
        .map(|t| {
            let mut list = members.remove(&t.id).unwrap_or_default();
            list.sort_by_key(|m| (!m.is_leader, m.joined_at));
            TeamResponse {
                id: t.id,
                event_id: t.event_id,
                name: t.name,
                leader_id: t.leader_id,
                max_size: t.max_size,
                config_version: t.config_version,
                problem_statement_id: t.problem_statement_id,
                members: list,
                created_at: t.created_at,
            }
        })
        .collect())
}

pub async fn team_response<C: ConnectionTrait>(
    db: &C,
    team: team::Model,
) -> Result<TeamResponse, AppError> {
    team_responses(db, vec![team])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("Team response missing".into()))
}

/// Only the leader may manage a team.
pub fn ensure_leader(team: &team::Model, user_id: i32) -> Result<(), AppError> {
    if team.leader_id != user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

/// Resolve team, event and inviter names for a batch of invitations.
pub async fn invitation_responses<C: ConnectionTrait>(
    db: &C,
    invitations: Vec<team_invitation::Model>,
) -> Result<Vec<InvitationResponse>, AppError> {
    if invitations.is_empty() {
        return Ok(Vec::new());
    }
    let team_ids: Vec<i32> = invitations.iter().map(|i| i.team_id).collect();
    let event_ids: Vec<i32> = invitations.iter().map(|i| i.event_id).collect();
    let user_ids: Vec<i32> = invitations.iter().map(|i| i.invited_by).collect();

    let teams: HashMap<i32, String> = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let events: HashMap<i32, String> = event::Entity::find()
        .filter(event::Column::Id.is_in(event_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    let inviters: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    Ok(invitations
        .into_iter()
        .map(|inv| InvitationResponse {
            id: inv.id,
            team_id: inv.team_id,
            team_name: teams.get(&inv.team_id).cloned().unwrap_or_default(),
            event_id: inv.event_id,
            event_name: events.get(&inv.event_id).cloned().unwrap_or_default(),
            invited_by: inviters.get(&inv.invited_by).cloned().unwrap_or_default(),
            status: inv.status,
            created_at: inv.created_at,
        })
        .collect())
}

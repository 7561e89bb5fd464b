use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_text;
use crate::entity::team_invitation::InvitationStatus;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[schema(example = "Null Pointers")]
    pub name: String,
}

pub fn validate_create_team(req: &CreateTeamRequest) -> Result<(), AppError> {
    validate_text("Team name", &req.name, 64)
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    /// Username of the student to invite.
    #[schema(example = "ravi_s")]
    pub username: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectProblemStatementRequest {
    #[schema(example = 7)]
    pub problem_statement_id: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub is_leader: bool,
    pub joined_at: DateTime<Utc>,
}

/// A team with its members in join order (leader first).
#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i32,
    pub event_id: i32,
    pub name: String,
    pub leader_id: i32,
    /// Size limit captured when the team was created.
    pub max_size: i32,
    /// Version of the global team size setting in effect at creation, if it applied.
    pub config_version: Option<i32>,
    pub problem_statement_id: Option<i32>,
    pub members: Vec<TeamMemberResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub id: i32,
    pub team_id: i32,
    pub team_name: String,
    pub event_id: i32,
    pub event_name: String,
    /// Username of the team leader who sent the invitation.
    pub invited_by: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

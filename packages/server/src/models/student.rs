use serde::Serialize;

use super::event::EventResponse;
use super::problem_statement::ProblemStatementResponse;
use super::team::TeamResponse;

/// One row of the student event browser.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEventItem {
    #[serde(flatten)]
    pub event: EventResponse,
    /// Whether the caller already belongs to a team in this event.
    pub is_registered: bool,
    /// Pending invitations addressed to the caller for this event.
    pub pending_invitations: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEventDetailResponse {
    pub event: EventResponse,
    pub my_team: Option<TeamResponse>,
    pub problem_statements: Vec<ProblemStatementResponse>,
    pub is_registered: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTeamItem {
    pub team_id: i32,
    pub team_name: String,
    pub event_id: i32,
    pub event_name: String,
    pub is_leader: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub teams: Vec<ProfileTeamItem>,
    /// Feedback tasks the student has not submitted yet.
    pub open_feedback_tasks: u64,
}

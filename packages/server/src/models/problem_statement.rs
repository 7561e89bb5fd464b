use chrono::{DateTime, Utc};
use common::hackathon::coerce_team_limit;
use serde::{Deserialize, Serialize};

use super::shared::{validate_description, validate_text};
use crate::entity::problem_statement;
use crate::error::AppError;

/// Request body for attaching a problem statement to an existing event.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemStatementRequest {
    #[schema(example = "API Design")]
    pub title: String,
    #[schema(example = "Build a REST API")]
    pub description: String,
    #[schema(example = 1)]
    pub event_id: i32,
    /// Coerced to at least 1; defaults to 1 when omitted.
    #[schema(example = 3)]
    pub max_teams: Option<i32>,
}

impl CreateProblemStatementRequest {
    pub fn effective_max_teams(&self) -> i32 {
        coerce_team_limit(self.max_teams.unwrap_or(1))
    }
}

pub fn validate_create_problem_statement(
    req: &CreateProblemStatementRequest,
) -> Result<(), AppError> {
    validate_text("Title", &req.title, 256)?;
    validate_description("Description", &req.description)
}

/// A problem statement with its current selection count.
#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatementResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = 1)]
    pub event_id: i32,
    #[schema(example = "API Design")]
    pub title: String,
    #[schema(example = "Build a REST API")]
    pub description: String,
    #[schema(example = 3)]
    pub max_teams: i32,
    /// Number of teams that selected this statement.
    #[schema(example = 0)]
    pub team_count: u64,
    pub is_full: bool,
    pub created_at: DateTime<Utc>,
}

impl ProblemStatementResponse {
    pub fn from_model(m: problem_statement::Model, team_count: u64) -> Self {
        Self {
            is_full: team_count >= Ord::max(m.max_teams, 0) as u64,
            id: m.id,
            event_id: m.event_id,
            title: m.title,
            description: m.description,
            max_teams: m.max_teams,
            team_count,
            created_at: m.created_at,
        }
    }
}

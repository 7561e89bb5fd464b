use chrono::{DateTime, Utc};
use common::{HackathonDraft, ProblemStatementDraft, ValidatedHackathon};
use serde::{Deserialize, Serialize};

use super::event::{EventResponse, validate_event_extras};
use super::problem_statement::ProblemStatementResponse;
use crate::error::AppError;

/// Create an event and all of its problem statements in one transaction.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHackathonRequest {
    #[schema(example = "Hack2025")]
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub problem_statements: Vec<ProblemStatementDraft>,
    #[serde(default)]
    pub description: String,
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_team_size: Option<i32>,
}

impl CreateHackathonRequest {
    fn draft(&self) -> HackathonDraft {
        HackathonDraft {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            problem_statements: self.problem_statements.clone(),
        }
    }
}

/// Apply the form rules, then the event-level extras.
pub fn validate_create_hackathon(
    req: &CreateHackathonRequest,
) -> Result<ValidatedHackathon, AppError> {
    let valid = req.draft().validate()?;
    if valid.name.chars().count() > 256 {
        return Err(AppError::Validation("Name must be 1-256 characters".into()));
    }
    validate_event_extras(
        valid.end_date,
        req.registration_deadline,
        req.max_team_size,
        req.venue.as_deref(),
    )?;
    Ok(valid)
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackathonResponse {
    pub event: EventResponse,
    pub problem_statements: Vec<ProblemStatementResponse>,
}

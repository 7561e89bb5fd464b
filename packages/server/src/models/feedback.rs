use chrono::{DateTime, Utc};
use common::{FeedbackStatus, OverallExperience, Round};
use serde::{Deserialize, Serialize};

use super::shared::validate_text;
use crate::entity::{feedback, feedback_task};
use crate::error::AppError;

/// Maximum number of rounds accepted in one feedback.
pub const MAX_ROUNDS: usize = 20;
/// Maximum number of fields accepted per round.
pub const MAX_FIELDS_PER_ROUND: usize = 50;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackTaskRequest {
    #[schema(example = "Acme Corp")]
    pub company_name: String,
    pub description: Option<String>,
    pub drive_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
}

pub fn validate_create_feedback_task(req: &CreateFeedbackTaskRequest) -> Result<(), AppError> {
    validate_text("Company name", &req.company_name, 128)?;
    if let Some(ref description) = req.description
        && description.len() > 65_536
    {
        return Err(AppError::Validation(
            "Description must be at most 64KB".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackTaskResponse {
    pub id: i32,
    #[schema(example = "Acme Corp")]
    pub company_name: String,
    pub description: Option<String>,
    pub drive_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<feedback_task::Model> for FeedbackTaskResponse {
    fn from(m: feedback_task::Model) -> Self {
        Self {
            id: m.id,
            company_name: m.company_name,
            description: m.description,
            drive_date: m.drive_date,
            deadline: m.deadline,
            created_at: m.created_at,
        }
    }
}

/// Admin view of a task with response counts.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminFeedbackTaskItem {
    #[serde(flatten)]
    pub task: FeedbackTaskResponse,
    pub draft_count: u64,
    pub submitted_count: u64,
}

/// A task as seen by one student.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeedbackTaskItem {
    #[serde(flatten)]
    pub task: FeedbackTaskResponse,
    pub status: FeedbackStatus,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub task: FeedbackTaskResponse,
    pub rounds: Vec<Round>,
    pub overall_experience: Option<OverallExperience>,
    pub additional_comments: String,
    pub status: FeedbackStatus,
    pub updated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FeedbackResponse {
    /// Build the response for a task, with or without a stored feedback row.
    pub fn new(task: feedback_task::Model, row: Option<feedback::Model>) -> Result<Self, AppError> {
        let task = FeedbackTaskResponse::from(task);
        match row {
            Some(row) => Ok(Self {
                task,
                rounds: decode_rounds(row.rounds)?,
                overall_experience: row.overall_experience,
                additional_comments: row.additional_comments,
                status: row.status,
                updated_at: Some(row.updated_at),
                submitted_at: row.submitted_at,
            }),
            None => Ok(Self {
                task,
                rounds: Vec::new(),
                overall_experience: None,
                additional_comments: String::new(),
                status: FeedbackStatus::Pending,
                updated_at: None,
                submitted_at: None,
            }),
        }
    }
}

/// Body of `PUT /student/feedback/{taskId}`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveFeedbackRequest {
    #[serde(default)]
    pub rounds: Vec<Round>,
    pub overall_experience: Option<OverallExperience>,
    #[serde(default)]
    pub additional_comments: String,
    /// `false` saves a draft; `true` validates and submits.
    #[serde(default)]
    pub is_submitted: bool,
}

/// Size limits that apply to drafts and submissions alike.
pub fn validate_feedback_shape(req: &SaveFeedbackRequest) -> Result<(), AppError> {
    if req.rounds.len() > MAX_ROUNDS {
        return Err(AppError::Validation(format!(
            "At most {MAX_ROUNDS} rounds are allowed"
        )));
    }
    if req
        .rounds
        .iter()
        .any(|r| r.fields.len() > MAX_FIELDS_PER_ROUND)
    {
        return Err(AppError::Validation(format!(
            "At most {MAX_FIELDS_PER_ROUND} fields are allowed per round"
        )));
    }
    if req.additional_comments.len() > 65_536 {
        return Err(AppError::Validation(
            "Additional comments must be at most 64KB".into(),
        ));
    }
    Ok(())
}

/// One student's response, as listed for admins.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponseItem {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub status: FeedbackStatus,
    pub rounds: Vec<Round>,
    pub overall_experience: Option<OverallExperience>,
    pub additional_comments: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

pub fn decode_rounds(value: serde_json::Value) -> Result<Vec<Round>, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Internal(format!("Corrupt feedback rounds: {e}")))
}

pub fn encode_rounds(rounds: &[Round]) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(rounds)
        .map_err(|e| AppError::Internal(format!("Failed to encode feedback rounds: {e}")))
}

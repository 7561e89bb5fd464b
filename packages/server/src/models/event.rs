use chrono::{DateTime, Utc};
use common::EventStatus;
use common::hackathon::{HackathonError, validate_time_range};
use common::team_size::validate_team_size;
use serde::{Deserialize, Serialize};

use super::problem_statement::ProblemStatementResponse;
use super::shared::{double_option, validate_text};
use super::team::TeamResponse;
use crate::entity::event;
use crate::error::AppError;

/// Request body for creating an event.
///
/// `name`, `startDate` and `endDate` are optional in the schema so that an
/// incomplete form is reported as `missing required fields` rather than as a
/// JSON decoding error.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[schema(example = "Hack2025")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "24-hour campus hackathon")]
    pub description: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[schema(example = "Main Auditorium")]
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Overrides the global team size for this event.
    #[schema(example = 4)]
    pub max_team_size: Option<i32>,
}

/// Event fields shared by create and hackathon requests, after validation.
pub struct ValidEventFields {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

pub fn validate_create_event(req: &CreateEventRequest) -> Result<ValidEventFields, AppError> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    let (Some(start_date), Some(end_date)) = (req.start_date, req.end_date) else {
        return Err(HackathonError::MissingRequiredFields.into());
    };
    if name.is_empty() {
        return Err(HackathonError::MissingRequiredFields.into());
    }
    validate_text("Name", name, 256)?;
    validate_time_range(start_date, end_date)?;
    validate_event_extras(
        end_date,
        req.registration_deadline,
        req.max_team_size,
        req.venue.as_deref(),
    )?;

    Ok(ValidEventFields {
        name: name.to_string(),
        start_date,
        end_date,
    })
}

/// Validate the optional event attributes against the event window.
pub fn validate_event_extras(
    end_date: DateTime<Utc>,
    registration_deadline: Option<DateTime<Utc>>,
    max_team_size: Option<i32>,
    venue: Option<&str>,
) -> Result<(), AppError> {
    if let Some(deadline) = registration_deadline
        && deadline > end_date
    {
        return Err(AppError::Validation(
            "registrationDeadline must not be after endDate".into(),
        ));
    }
    if let Some(size) = max_team_size {
        validate_team_size(size)?;
    }
    if let Some(venue) = venue
        && venue.chars().count() > 256
    {
        return Err(AppError::Validation(
            "Venue must be at most 256 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for partially updating an event.
#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub venue: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub registration_deadline: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub max_team_size: Option<Option<i32>>,
}

pub fn validate_update_event(req: &UpdateEventRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_text("Name", name, 256)?;
    }
    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        validate_time_range(start, end)?;
    }
    if let Some(Some(size)) = req.max_team_size {
        validate_team_size(size)?;
    }
    Ok(())
}

/// Query parameters for the admin event list.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventListQuery {
    /// Case-insensitive substring match on the event name.
    pub search: Option<String>,
    /// Only return events currently in this phase.
    pub status: Option<EventStatus>,
}

/// An event with its derived status.
#[derive(Serialize, Deserialize, Clone, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Hack2025")]
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_team_size: Option<i32>,
    /// Computed from the time window when the response is built.
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventResponse {
    pub fn from_model(m: event::Model, now: DateTime<Utc>) -> Self {
        Self {
            status: EventStatus::classify(now, m.start_date, m.end_date),
            id: m.id,
            name: m.name,
            description: m.description,
            start_date: m.start_date,
            end_date: m.end_date,
            venue: m.venue,
            registration_deadline: m.registration_deadline,
            max_team_size: m.max_team_size,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<event::Model> for EventResponse {
    fn from(m: event::Model) -> Self {
        Self::from_model(m, Utc::now())
    }
}

/// `{ "event": ... }` wrapper returned by event creation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct EventEnvelope {
    pub event: EventResponse,
}

/// One row of the admin event list.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventListItem {
    #[serde(flatten)]
    pub event: EventResponse,
    #[schema(example = 0)]
    pub team_count: u64,
    #[schema(example = 1)]
    pub problem_statement_count: u64,
}

/// Full admin view of one event.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminEventDetailResponse {
    pub event: EventResponse,
    pub teams: Vec<TeamResponse>,
    pub problem_statements: Vec<ProblemStatementResponse>,
}

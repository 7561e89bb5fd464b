//! Hackathon creation: draft validation and the admin form state machine.
//!
//! A hackathon is created as one event followed by one problem statement per
//! valid draft. Validation happens here, before anything reaches the network,
//! so that a rejected form never creates records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest team limit a problem statement may carry.
pub const MIN_TEAM_LIMIT: i32 = 1;

/// Reasons a hackathon draft is rejected. Checked in declaration order; the
/// first failing rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HackathonError {
    #[error("missing required fields")]
    MissingRequiredFields,
    #[error("invalid time range")]
    InvalidTimeRange,
    #[error("no valid problem statements")]
    NoValidProblemStatements,
    #[error("a submission is already in progress")]
    SubmissionInProgress,
}

fn default_team_limit() -> i32 {
    MIN_TEAM_LIMIT
}

/// A problem statement as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatementDraft {
    #[schema(example = "API Design")]
    pub title: String,
    #[schema(example = "Build a REST API")]
    pub description: String,
    /// Maximum number of teams that may pick this statement. Values below 1
    /// are coerced to 1.
    #[serde(default = "default_team_limit")]
    #[schema(example = 3)]
    pub team_limit: i32,
}

impl Default for ProblemStatementDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            team_limit: MIN_TEAM_LIMIT,
        }
    }
}

impl ProblemStatementDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, team_limit: i32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            team_limit,
        }
    }

    /// A draft counts only if both title and description have content.
    pub fn is_filled(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// The whole admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HackathonDraft {
    #[schema(example = "Hack2025")]
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub problem_statements: Vec<ProblemStatementDraft>,
}

/// A problem statement that passed validation, trimmed and with its limit coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidProblemStatement {
    pub title: String,
    pub description: String,
    pub max_teams: i32,
}

/// A draft that passed every rule and is ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedHackathon {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub problem_statements: Vec<ValidProblemStatement>,
}

/// Clamp a requested team limit to at least [`MIN_TEAM_LIMIT`].
pub fn coerce_team_limit(limit: i32) -> i32 {
    limit.max(MIN_TEAM_LIMIT)
}

/// Reject an event window whose start is not strictly before its end.
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), HackathonError> {
    if start >= end {
        return Err(HackathonError::InvalidTimeRange);
    }
    Ok(())
}

impl HackathonDraft {
    /// Run the validation rules in order.
    ///
    /// Unfilled problem statement drafts are dropped without being reported.
    pub fn validate(&self) -> Result<ValidatedHackathon, HackathonError> {
        let name = self.name.trim();
        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(HackathonError::MissingRequiredFields);
        };
        if name.is_empty() {
            return Err(HackathonError::MissingRequiredFields);
        }

        validate_time_range(start_date, end_date)?;

        let problem_statements: Vec<ValidProblemStatement> = self
            .problem_statements
            .iter()
            .filter(|ps| ps.is_filled())
            .map(|ps| ValidProblemStatement {
                title: ps.title.trim().to_string(),
                description: ps.description.trim().to_string(),
                max_teams: coerce_team_limit(ps.team_limit),
            })
            .collect();

        if problem_statements.is_empty() {
            return Err(HackathonError::NoValidProblemStatements);
        }

        Ok(ValidatedHackathon {
            name: name.to_string(),
            start_date,
            end_date,
            problem_statements,
        })
    }
}

/// Phase of the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Editing,
    Validating,
    Submitting,
}

/// The admin hackathon form.
///
/// `editing -> validating -> submitting -> editing`. A failed submission
/// returns to `editing` with a message and keeps the draft so the admin can
/// retry; a successful one resets the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackathonForm {
    draft: HackathonDraft,
    state: FormState,
    message: Option<String>,
}

impl Default for HackathonForm {
    fn default() -> Self {
        Self::new()
    }
}

impl HackathonForm {
    /// An empty form with one blank problem statement row.
    pub fn new() -> Self {
        Self::with_draft(HackathonDraft {
            problem_statements: vec![ProblemStatementDraft::default()],
            ..Default::default()
        })
    }

    pub fn with_draft(draft: HackathonDraft) -> Self {
        Self {
            draft,
            state: FormState::Editing,
            message: None,
        }
    }

    pub fn draft(&self) -> &HackathonDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The message left by the last failed validation or submission.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Apply an edit to the draft. Inputs are locked while a submission is in flight.
    pub fn edit<F>(&mut self, f: F) -> Result<(), HackathonError>
    where
        F: FnOnce(&mut HackathonDraft),
    {
        if self.state == FormState::Submitting {
            return Err(HackathonError::SubmissionInProgress);
        }
        f(&mut self.draft);
        Ok(())
    }

    pub fn add_problem_statement(&mut self) -> Result<(), HackathonError> {
        self.edit(|d| d.problem_statements.push(ProblemStatementDraft::default()))
    }

    /// Remove the row at `index`; out-of-range indices are ignored.
    pub fn remove_problem_statement(&mut self, index: usize) -> Result<(), HackathonError> {
        self.edit(|d| {
            if index < d.problem_statements.len() {
                d.problem_statements.remove(index);
            }
        })
    }

    /// Validate the draft and, on success, enter `submitting`.
    pub fn begin_submit(&mut self) -> Result<ValidatedHackathon, HackathonError> {
        if self.state == FormState::Submitting {
            return Err(HackathonError::SubmissionInProgress);
        }

        self.state = FormState::Validating;
        match self.draft.validate() {
            Ok(valid) => {
                self.state = FormState::Submitting;
                self.message = None;
                Ok(valid)
            }
            Err(e) => {
                self.state = FormState::Editing;
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The submission succeeded: clear the form.
    pub fn complete(&mut self) {
        *self = Self::new();
    }

    /// The submission failed: stay on the form and show `message`.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = FormState::Editing;
        self.message = Some(message.into());
    }
}

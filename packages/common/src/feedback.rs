//! Interview feedback: the round/field editor and its draft/submit lifecycle.

#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a student's feedback for a task stands.
///
/// Transitions are monotonic: `pending -> draft -> submitted`, and
/// `submitted` is terminal. `pending` is never stored; it is the absence of a
/// feedback row.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "draft"))]
    Draft,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "submitted"))]
    Submitted,
}

impl FeedbackStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    /// Whether moving from `self` to `next` respects the lifecycle order.
    /// Staying on `draft` (re-saving a draft) is allowed.
    pub fn can_transition_to(&self, next: FeedbackStatus) -> bool {
        match (self, next) {
            (Self::Submitted, _) => false,
            (Self::Pending, Self::Draft | Self::Submitted) => true,
            (Self::Draft, Self::Draft | Self::Submitted) => true,
            _ => false,
        }
    }
}

/// The student's overall impression of the interview process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum OverallExperience {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Excellent"))]
    Excellent,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Good"))]
    Good,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Average"))]
    Average,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Poor"))]
    Poor,
}

/// A question asked during a round and the student's answer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[schema(example = "What data structures were asked?")]
    pub question: String,
    #[serde(default)]
    #[schema(example = "Heaps and tries")]
    pub answer: String,
}

/// One interview round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based; always equals the round's position in its list.
    #[serde(default)]
    #[schema(example = 1)]
    pub round_number: u32,
    #[schema(example = "Technical Interview")]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("feedback has already been submitted")]
    AlreadySubmitted,
    #[error("round {0} does not exist")]
    RoundNotFound(usize),
    #[error("field {field} does not exist in round {round}")]
    FieldNotFound { round: usize, field: usize },
    #[error("at least one round is required")]
    NoRounds,
    #[error("round {0} must have a name")]
    UnnamedRound(u32),
}

/// Rewrite every `round_number` to its 1-based position.
pub fn renumber(rounds: &mut [Round]) {
    for (i, round) in rounds.iter_mut().enumerate() {
        round.round_number = i as u32 + 1;
    }
}

/// Rules a feedback must satisfy before it can be submitted.
pub fn validate_for_submit(rounds: &[Round]) -> Result<(), FeedbackError> {
    if rounds.is_empty() {
        return Err(FeedbackError::NoRounds);
    }
    for (i, round) in rounds.iter().enumerate() {
        if round.name.trim().is_empty() {
            return Err(FeedbackError::UnnamedRound(i as u32 + 1));
        }
    }
    Ok(())
}

/// In-memory feedback editor held by the student until they save or submit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    rounds: Vec<Round>,
    overall_experience: Option<OverallExperience>,
    additional_comments: String,
    status: FeedbackStatus,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an editor from persisted state. Round numbers are normalized.
    pub fn from_parts(
        mut rounds: Vec<Round>,
        overall_experience: Option<OverallExperience>,
        additional_comments: String,
        status: FeedbackStatus,
    ) -> Self {
        renumber(&mut rounds);
        Self {
            rounds,
            overall_experience,
            additional_comments,
            status,
        }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn overall_experience(&self) -> Option<OverallExperience> {
        self.overall_experience
    }

    pub fn additional_comments(&self) -> &str {
        &self.additional_comments
    }

    pub fn status(&self) -> FeedbackStatus {
        self.status
    }

    fn ensure_editable(&self) -> Result<(), FeedbackError> {
        if self.status.is_terminal() {
            return Err(FeedbackError::AlreadySubmitted);
        }
        Ok(())
    }

    fn round_mut(&mut self, index: usize) -> Result<&mut Round, FeedbackError> {
        self.ensure_editable()?;
        self.rounds
            .get_mut(index)
            .ok_or(FeedbackError::RoundNotFound(index))
    }

    /// Append an empty round and return its number.
    pub fn add_round(&mut self, name: impl Into<String>) -> Result<u32, FeedbackError> {
        self.ensure_editable()?;
        let round_number = self.rounds.len() as u32 + 1;
        self.rounds.push(Round {
            round_number,
            name: name.into(),
            fields: Vec::new(),
        });
        Ok(round_number)
    }

    /// Remove the round at `index` and renumber everything after it.
    pub fn remove_round(&mut self, index: usize) -> Result<Round, FeedbackError> {
        self.ensure_editable()?;
        if index >= self.rounds.len() {
            return Err(FeedbackError::RoundNotFound(index));
        }
        let removed = self.rounds.remove(index);
        renumber(&mut self.rounds);
        Ok(removed)
    }

    pub fn rename_round(&mut self, index: usize, name: impl Into<String>) -> Result<(), FeedbackError> {
        self.round_mut(index)?.name = name.into();
        Ok(())
    }

    /// Append a question/answer pair to a round and return its index.
    pub fn add_field(
        &mut self,
        round: usize,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<usize, FeedbackError> {
        let r = self.round_mut(round)?;
        r.fields.push(Field {
            question: question.into(),
            answer: answer.into(),
        });
        Ok(r.fields.len() - 1)
    }

    pub fn remove_field(&mut self, round: usize, field: usize) -> Result<Field, FeedbackError> {
        let r = self.round_mut(round)?;
        if field >= r.fields.len() {
            return Err(FeedbackError::FieldNotFound { round, field });
        }
        Ok(r.fields.remove(field))
    }

    pub fn edit_field(
        &mut self,
        round: usize,
        field: usize,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<(), FeedbackError> {
        let f = self
            .round_mut(round)?
            .fields
            .get_mut(field)
            .ok_or(FeedbackError::FieldNotFound { round, field })?;
        f.question = question.into();
        f.answer = answer.into();
        Ok(())
    }

    pub fn set_overall_experience(
        &mut self,
        experience: Option<OverallExperience>,
    ) -> Result<(), FeedbackError> {
        self.ensure_editable()?;
        self.overall_experience = experience;
        Ok(())
    }

    pub fn set_additional_comments(&mut self, comments: impl Into<String>) -> Result<(), FeedbackError> {
        self.ensure_editable()?;
        self.additional_comments = comments.into();
        Ok(())
    }

    fn transition(&mut self, next: FeedbackStatus) -> Result<(), FeedbackError> {
        if !self.status.can_transition_to(next) {
            return Err(FeedbackError::AlreadySubmitted);
        }
        self.status = next;
        Ok(())
    }

    /// Persist without validation. Moves `pending` to `draft`.
    pub fn save_draft(&mut self) -> Result<(), FeedbackError> {
        self.transition(FeedbackStatus::Draft)
    }

    /// Validate and lock the feedback.
    pub fn submit(&mut self) -> Result<(), FeedbackError> {
        self.ensure_editable()?;
        validate_for_submit(&self.rounds)?;
        self.transition(FeedbackStatus::Submitted)
    }
}

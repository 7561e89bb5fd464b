pub mod event_status;
pub mod feedback;
pub mod hackathon;
pub mod team_size;

pub use event_status::EventStatus;
pub use feedback::{FeedbackError, FeedbackForm, FeedbackStatus, Field, OverallExperience, Round};
pub use hackathon::{
    HackathonDraft, HackathonError, HackathonForm, ProblemStatementDraft, ValidatedHackathon,
};
pub use team_size::{TeamSizeError, TeamSizeSetting};

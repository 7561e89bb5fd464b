//! Admin hackathon creation from the client side.
//!
//! The sequential path creates the event first and then each problem statement
//! in order, stopping at the first failure. Nothing is rolled back; a failure
//! after the event exists is reported as [`WorkflowError::PartialFailure`] so
//! the caller can see what was left behind. The atomic path hands the whole
//! draft to `POST /admin/hackathons` instead.

use common::{HackathonError, HackathonForm};
use thiserror::Error;

use crate::client::{
    ApiError, EventSummary, HackathonCreated, NewEvent, NewProblemStatement, PortalClient,
    ProblemStatementSummary,
};

/// The calls the hackathon workflow needs from the API.
pub trait HackathonApi {
    fn create_event(&self, event: &NewEvent) -> Result<EventSummary, ApiError>;
    fn create_problem_statement(
        &self,
        ps: &NewProblemStatement,
    ) -> Result<ProblemStatementSummary, ApiError>;
    fn list_events(&self) -> Result<Vec<EventSummary>, ApiError>;
    fn create_hackathon(
        &self,
        draft: &common::HackathonDraft,
    ) -> Result<HackathonCreated, ApiError>;
}

impl HackathonApi for PortalClient {
    fn create_event(&self, event: &NewEvent) -> Result<EventSummary, ApiError> {
        PortalClient::create_event(self, event)
    }

    fn create_problem_statement(
        &self,
        ps: &NewProblemStatement,
    ) -> Result<ProblemStatementSummary, ApiError> {
        PortalClient::create_problem_statement(self, ps)
    }

    fn list_events(&self) -> Result<Vec<EventSummary>, ApiError> {
        PortalClient::list_events(self)
    }

    fn create_hackathon(
        &self,
        draft: &common::HackathonDraft,
    ) -> Result<HackathonCreated, ApiError> {
        PortalClient::create_hackathon(self, draft)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The form was rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(#[from] HackathonError),
    /// The event itself could not be created; nothing exists server-side.
    #[error("{0}")]
    EventCreation(ApiError),
    /// The event exists but a problem statement failed.
    #[error(
        "event {event_id} was created, but problem statement '{failed_title}' failed: {source} \
         ({} of its problem statements were created)",
        .created.len()
    )]
    PartialFailure {
        event_id: i32,
        /// Titles created before the failure, in order.
        created: Vec<String>,
        failed_title: String,
        source: ApiError,
    },
    /// Everything was created but the event list could not be reloaded.
    #[error("hackathon created, but refreshing the event list failed: {0}")]
    Refresh(ApiError),
}

/// Validate the form, create the event, then its problem statements one by one.
///
/// On success the form is reset and the refreshed event list is returned.
pub fn create_hackathon<A: HackathonApi>(
    api: &A,
    form: &mut HackathonForm,
) -> Result<Vec<EventSummary>, WorkflowError> {
    let valid = form.begin_submit()?;

    let event = match api.create_event(&NewEvent {
        name: valid.name,
        start_date: valid.start_date,
        end_date: valid.end_date,
    }) {
        Ok(event) => event,
        Err(e) => {
            form.fail(e.to_string());
            return Err(WorkflowError::EventCreation(e));
        }
    };
    tracing::info!(event_id = event.id, "Event created");

    let mut created = Vec::with_capacity(valid.problem_statements.len());
    for ps in valid.problem_statements {
        let request = NewProblemStatement {
            title: ps.title,
            description: ps.description,
            event_id: event.id,
            max_teams: ps.max_teams,
        };
        if let Err(e) = api.create_problem_statement(&request) {
            let err = WorkflowError::PartialFailure {
                event_id: event.id,
                created,
                failed_title: request.title,
                source: e,
            };
            form.fail(err.to_string());
            return Err(err);
        }
        created.push(request.title);
    }

    form.complete();
    api.list_events().map_err(WorkflowError::Refresh)
}

/// Same form handling, but the server creates everything in one transaction.
pub fn create_hackathon_atomic<A: HackathonApi>(
    api: &A,
    form: &mut HackathonForm,
) -> Result<Vec<EventSummary>, WorkflowError> {
    form.begin_submit()?;

    if let Err(e) = api.create_hackathon(form.draft()) {
        form.fail(e.to_string());
        return Err(WorkflowError::EventCreation(e));
    }

    form.complete();
    api.list_events().map_err(WorkflowError::Refresh)
}

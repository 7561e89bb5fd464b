use chrono::{DateTime, Utc};
use common::{EventStatus, HackathonDraft, TeamSizeSetting};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed API call. Server messages are kept verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Server {
        status: StatusCode,
        code: String,
        message: String,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The token was missing, malformed or expired.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            ApiError::Server { status, code, .. }
                if *status == StatusCode::UNAUTHORIZED && code != "INVALID_CREDENTIALS"
        )
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProblemStatement {
    pub title: String,
    pub description: String,
    pub event_id: i32,
    pub max_teams: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: i32,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: EventStatus,
    #[serde(default)]
    pub team_count: u64,
    #[serde(default)]
    pub problem_statement_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatementSummary {
    pub id: i32,
    pub event_id: i32,
    pub title: String,
    pub max_teams: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HackathonCreated {
    pub event: EventSummary,
    pub problem_statements: Vec<ProblemStatementSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

#[derive(Deserialize)]
struct EventEnvelope {
    event: EventSummary,
}

/// Blocking client for `/api/v1`.
pub struct PortalClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl PortalClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("portal-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: format!("{}/api/v1", base_url.trim_end_matches('/')),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let req = match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send()?;
        let status = resp.status();
        tracing::debug!(%status, url = %resp.url(), "API response");

        if status.is_success() {
            return Ok(resp.json()?);
        }

        let text = resp.text()?;
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => Err(ApiError::Server {
                status,
                code: body.code,
                message: body.message,
            }),
            Err(_) => Err(ApiError::Server {
                status,
                code: "UNKNOWN".into(),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            }),
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.send(
            self.http
                .post(self.url("/auth/login"))
                .json(&serde_json::json!({ "username": username, "password": password })),
        )
    }

    pub fn list_events(&self) -> Result<Vec<EventSummary>, ApiError> {
        self.search_events(None, None)
    }

    /// `GET /admin/events` narrowed by derived status and a name substring.
    pub fn search_events(
        &self,
        status: Option<EventStatus>,
        search: Option<&str>,
    ) -> Result<Vec<EventSummary>, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref status) = status {
            query.push(("status", status.as_str()));
        }
        if let Some(search) = search {
            query.push(("search", search));
        }
        self.send(self.http.get(self.url("/admin/events")).query(&query))
    }

    pub fn create_event(&self, event: &NewEvent) -> Result<EventSummary, ApiError> {
        let envelope: EventEnvelope =
            self.send(self.http.post(self.url("/admin/events")).json(event))?;
        Ok(envelope.event)
    }

    pub fn create_problem_statement(
        &self,
        ps: &NewProblemStatement,
    ) -> Result<ProblemStatementSummary, ApiError> {
        self.send(self.http.post(self.url("/admin/problem-statements")).json(ps))
    }

    pub fn create_hackathon(&self, draft: &HackathonDraft) -> Result<HackathonCreated, ApiError> {
        self.send(self.http.post(self.url("/admin/hackathons")).json(draft))
    }

    pub fn get_team_size(&self) -> Result<TeamSizeSetting, ApiError> {
        self.send(self.http.get(self.url("/admin/settings/team-size")))
    }

    pub fn set_team_size(&self, team_size: i32) -> Result<TeamSizeSetting, ApiError> {
        self.send(
            self.http
                .post(self.url("/admin/settings/team-size"))
                .json(&serde_json::json!({ "teamSize": team_size })),
        )
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase of an event, derived from its time window.
///
/// Never persisted: every reader recomputes it from `start_date`/`end_date`
/// so the stored timestamps remain the only source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// The event has not started yet.
    Upcoming,
    /// `now` lies inside `[start, end]`, both bounds inclusive.
    Ongoing,
    /// The event has ended.
    Past,
}

impl EventStatus {
    /// Classify `now` against an event window.
    pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if now < start {
            Self::Upcoming
        } else if now > end {
            Self::Past
        } else {
            Self::Ongoing
        }
    }

    /// Whether students may still register or change teams.
    pub fn accepts_registration(&self) -> bool {
        !matches!(self, Self::Past)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Past => "past",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "ongoing" => Ok(Self::Ongoing),
            "past" => Ok(Self::Past),
            _ => Err(format!(
                "Invalid event status '{s}'. Valid values: upcoming, ongoing, past"
            )),
        }
    }
}

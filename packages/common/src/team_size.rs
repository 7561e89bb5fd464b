use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Team size used when no global setting has been written yet.
pub const DEFAULT_TEAM_SIZE: i32 = 4;

/// Upper bound accepted for any team size setting.
pub const MAX_TEAM_SIZE: i32 = 20;

/// Config key holding the global team size.
pub const TEAM_SIZE_KEY: &str = "team_size";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamSizeError {
    #[error("team size must be between 1 and {MAX_TEAM_SIZE}")]
    OutOfRange,
    #[error("team is full ({max_size} members)")]
    TeamFull { max_size: i32 },
}

pub fn validate_team_size(size: i32) -> Result<(), TeamSizeError> {
    if !(1..=MAX_TEAM_SIZE).contains(&size) {
        return Err(TeamSizeError::OutOfRange);
    }
    Ok(())
}

/// A snapshot of the global team size configuration.
///
/// Passed explicitly into team creation so the limit a team was created under
/// can be recorded alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamSizeSetting {
    #[schema(example = 4)]
    pub team_size: i32,
    /// Incremented on every write. `0` means the default has never been overridden.
    #[schema(example = 2)]
    pub version: i32,
}

impl Default for TeamSizeSetting {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            version: 0,
        }
    }
}

/// The limit that applies to one team, and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveTeamSize {
    pub max_size: i32,
    /// Version of the global setting used, or `None` when the event override applied.
    pub config_version: Option<i32>,
}

impl TeamSizeSetting {
    /// Resolve the limit for a team in an event that may carry its own override.
    pub fn effective_for(&self, event_override: Option<i32>) -> EffectiveTeamSize {
        match event_override {
            Some(max_size) => EffectiveTeamSize {
                max_size,
                config_version: None,
            },
            None => EffectiveTeamSize {
                max_size: self.team_size,
                config_version: Some(self.version),
            },
        }
    }
}

/// Check that one more member fits in a team of `current` members.
pub fn ensure_room(current: u64, max_size: i32) -> Result<(), TeamSizeError> {
    if current >= max_size.max(0) as u64 {
        return Err(TeamSizeError::TeamFull { max_size });
    }
    Ok(())
}

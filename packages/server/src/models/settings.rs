use common::team_size::validate_team_size;
use serde::Deserialize;

use crate::error::AppError;

/// Request body for changing the global team size.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamSizeRequest {
    #[schema(example = 4)]
    pub team_size: i32,
}

pub fn validate_update_team_size(req: &UpdateTeamSizeRequest) -> Result<(), AppError> {
    validate_team_size(req.team_size)?;
    Ok(())
}

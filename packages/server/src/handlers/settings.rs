use axum::Json;
use axum::extract::State;
use common::TeamSizeSetting;
use sea_orm::TransactionTrait;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::settings::*;
use crate::state::AppState;
use crate::utils::settings::{load_team_size, store_team_size};

#[utoipa::path(
    get,
    path = "/settings/team-size",
    tag = "Settings",
    operation_id = "getTeamSize",
    summary = "Read the global team size",
    description = "Returns the current global team size and its version. Version 0 means the configured default is in effect.",
    responses(
        (status = 200, description = "Current setting", body = TeamSizeSetting),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_team_size(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TeamSizeSetting>, AppError> {
    auth_user.require_permission("settings:manage")?;
    let setting = load_team_size(&state.db, state.config.portal.default_team_size).await?;
    Ok(Json(setting))
}

#[utoipa::path(
    post,
    path = "/settings/team-size",
    tag = "Settings",
    operation_id = "setTeamSize",
    summary = "Change the global team size",
    description = "Stores a new global team size and bumps its version. Existing teams keep the limit they were created with.",
    request_body = UpdateTeamSizeRequest,
    responses(
        (status = 200, description = "Updated setting", body = TeamSizeSetting),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Concurrent first write (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_size = payload.team_size))]
pub async fn set_team_size(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateTeamSizeRequest>,
) -> Result<Json<TeamSizeSetting>, AppError> {
    auth_user.require_permission("settings:manage")?;
    validate_update_team_size(&payload)?;

    let txn = state.db.begin().await?;
    let setting = store_team_size(&txn, payload.team_size, auth_user.user_id).await?;
    txn.commit().await?;

    tracing::info!(
        team_size = setting.team_size,
        version = setting.version,
        user_id = auth_user.user_id,
        "Team size updated"
    );
    Ok(Json(setting))
}

use common::TeamSizeSetting;
use common::team_size::TEAM_SIZE_KEY;
use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::app_config;
use crate::error::AppError;

fn parse_team_size(row: &app_config::Model) -> Result<TeamSizeSetting, AppError> {
    let team_size = row.value.parse::<i32>().map_err(|e| {
        AppError::Internal(format!("Invalid '{TEAM_SIZE_KEY}' setting '{}': {e}", row.value))
    })?;
    Ok(TeamSizeSetting {
        team_size,
        version: row.version,
    })
}

/// Read the global team size, falling back to `default_size` at version 0.
pub async fn load_team_size<C: ConnectionTrait>(
    db: &C,
    default_size: i32,
) -> Result<TeamSizeSetting, AppError> {
    match app_config::Entity::find_by_id(TEAM_SIZE_KEY).one(db).await? {
        Some(row) => parse_team_size(&row),
        None => Ok(TeamSizeSetting {
            team_size: default_size,
            version: 0,
        }),
    }
}

/// Write the global team size and bump its version.
pub async fn store_team_size(
    txn: &DatabaseTransaction,
    team_size: i32,
    updated_by: i32,
) -> Result<TeamSizeSetting, AppError> {
    let now = chrono::Utc::now();
    let existing = app_config::Entity::find_by_id(TEAM_SIZE_KEY)
        .lock(LockType::Update)
        .one(txn)
        .await?;

    let row = match existing {
        Some(row) => {
            let version = row.version + 1;
            let mut active: app_config::ActiveModel = row.into();
            active.value = Set(team_size.to_string());
            active.version = Set(version);
            active.updated_by = Set(Some(updated_by));
            active.updated_at = Set(now);
            active.update(txn).await?
        }
        None => {
            app_config::ActiveModel {
                key: Set(TEAM_SIZE_KEY.to_string()),
                value: Set(team_size.to_string()),
                version: Set(1),
                updated_by: Set(Some(updated_by)),
                updated_at: Set(now),
            }
            .insert(txn)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Team size was changed concurrently, retry".into())
                }
                _ => AppError::from(e),
            })?
        }
    };

    parse_team_size(&row)
}

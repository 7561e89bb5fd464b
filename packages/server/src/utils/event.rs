use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::EventStatus;
use sea_orm::sea_query::LockType;
use sea_orm::*;

use crate::entity::{event, problem_statement, team};
use crate::error::AppError;
use crate::models::problem_statement::ProblemStatementResponse;

/// Look up an event by ID, returning 404 if not found.
pub async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

/// Same as [`find_event`], but holds a row lock until the transaction ends.
pub async fn find_event_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

/// Refuse team changes once an event is over or its registration deadline passed.
pub fn ensure_registration_open(event: &event::Model, now: DateTime<Utc>) -> Result<(), AppError> {
    if !EventStatus::classify(now, event.start_date, event.end_date).accepts_registration() {
        return Err(AppError::Validation("Event has ended".into()));
    }
    if let Some(deadline) = event.registration_deadline
        && now > deadline
    {
        return Err(AppError::Validation(
            "Registration deadline has passed".into(),
        ));
    }
    Ok(())
}

/// Number of teams that selected each problem statement of an event.
pub async fn selection_counts<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> Result<HashMap<i32, u64>, AppError> {
    let rows: Vec<(Option<i32>, i64)> = team::Entity::find()
        .filter(team::Column::EventId.eq(event_id))
        .filter(team::Column::ProblemStatementId.is_not_null())
        .select_only()
        .column(team::Column::ProblemStatementId)
        .column_as(team::Column::Id.count(), "team_count")
        .group_by(team::Column::ProblemStatementId)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(ps_id, count)| ps_id.map(|id| (id, Ord::max(count, 0) as u64)))
        .collect())
}

/// All problem statements of an event, in creation order, with selection counts.
pub async fn problem_statements_for_event<C: ConnectionTrait>(
    db: &C,
    event_id: i32,
) -> Result<Vec<ProblemStatementResponse>, AppError> {
    let statements = problem_statement::Entity::find()
        .filter(problem_statement::Column::EventId.eq(event_id))
        .order_by_asc(problem_statement::Column::Id)
        .all(db)
        .await?;
    let counts = selection_counts(db, event_id).await?;

    Ok(statements
        .into_iter()
        .map(|ps| {
            let count = counts.get(&ps.id).copied().unwrap_or(0);
            ProblemStatementResponse::from_model(ps, count)
        })
        .collect())
}

/// Count rows of `E` grouped by an `event_id`-like column.
pub async fn count_by_event<E, C>(
    db: &C,
    column: E::Column,
    event_ids: Vec<i32>,
) -> Result<HashMap<i32, u64>, AppError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if event_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = E::find()
        .filter(column.is_in(event_ids))
        .select_only()
        .column(column)
        .column_as(column.count(), "row_count")
        .group_by(column)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, Ord::max(count, 0) as u64))
        .collect())
}

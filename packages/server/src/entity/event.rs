use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A hackathon event. Its upcoming/ongoing/past status is derived from
/// `start_date` and `end_date` at read time and never stored.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    pub start_date: DateTimeUtc,
    #[sea_orm(indexed)]
    pub end_date: DateTimeUtc,
    pub venue: Option<String>,
    pub registration_deadline: Option<DateTimeUtc>,
    /// Per-event override of the global team size.
    pub max_team_size: Option<i32>,

    pub created_by: i32,

    #[sea_orm(has_many)]
    pub problem_statements: HasMany<super::problem_statement::Entity>,

    #[sea_orm(has_many)]
    pub teams: HasMany<super::team::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(indexed)]
    pub event_id: i32,
    #[sea_orm(belongs_to, from = "event_id", to = "id")]
    pub event: HasOne<super::event::Entity>,

    /// First member; the only one allowed to invite or pick a problem statement.
    pub leader_id: i32,

    /// Size limit in effect when the team was created.
    pub max_size: i32,
    /// Version of the global team size config used, NULL when the event override applied.
    pub config_version: Option<i32>,

    pub problem_statement_id: Option<i32>,
    #[sea_orm(belongs_to, from = "problem_statement_id", to = "id")]
    pub problem_statement: Option<super::problem_statement::Entity>,

    #[sea_orm(has_many)]
    pub members: HasMany<super::team_member::Entity>,

    #[sea_orm(has_many)]
    pub invitations: HasMany<super::team_invitation::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

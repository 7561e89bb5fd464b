use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A placement drive students are asked to report on.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback_task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub company_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub drive_date: Option<DateTimeUtc>,
    pub deadline: Option<DateTimeUtc>,

    #[sea_orm(has_many)]
    pub responses: HasMany<super::feedback::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

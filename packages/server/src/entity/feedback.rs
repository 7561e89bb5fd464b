use common::{FeedbackStatus, OverallExperience};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One student's feedback for one task.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub task_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(belongs_to, from = "task_id", to = "id")]
    pub task: Option<super::feedback_task::Entity>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: Option<super::user::Entity>,

    /// Rounds stored as a JSON array of `{roundNumber, name, fields}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub rounds: serde_json::Value,
    pub overall_experience: Option<OverallExperience>,
    #[sea_orm(column_type = "Text")]
    pub additional_comments: String,

    /// Only `draft` or `submitted` are ever stored.
    pub status: FeedbackStatus,

    pub updated_at: DateTimeUtc,
    pub submitted_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

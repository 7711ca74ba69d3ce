use ranking::SubjectScores;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marks for one registration. `total` and `percentage` are always written
/// from `ranking::compute_score` over the five stored subjects.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exam_result")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub registration_id: i32,
    #[sea_orm(belongs_to, from = "registration_id", to = "id")]
    pub registration: HasOne<super::registration::Entity>,

    /// Copied from the registration so leaderboards can filter without a join.
    pub exam_year_id: i32,

    pub gk: i32,
    pub science: i32,
    pub mathematics: i32,
    pub logical_reasoning: i32,
    pub current_affairs: i32,
    pub total: i32,
    #[sea_orm(column_type = "Double")]
    pub percentage: f64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    pub fn scores(&self) -> SubjectScores {
        SubjectScores::new(
            self.gk,
            self.science,
            self.mathematics,
            self.logical_reasoning,
            self.current_affairs,
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}

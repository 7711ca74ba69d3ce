use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exam_year")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Calendar year used by the public endpoints.
    #[sea_orm(unique)]
    pub year: i32,
    pub registration_open_date: Date,
    pub registration_close_date: Date,
    pub exam_date: Date,
    pub result_date: Date,
    /// `active` or `archived`.
    pub status: String,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::registration::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

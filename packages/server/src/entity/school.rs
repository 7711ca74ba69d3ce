use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unique per `(district_id, name)`; the index is created in `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub address: Option<String>,
    /// One of: Assamese, English, Both.
    pub medium: Option<String>,
    /// `active` or `inactive`.
    pub status: String,

    pub district_id: i32,
    #[sea_orm(belongs_to, from = "district_id", to = "id")]
    pub district: HasOne<super::district::Entity>,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::registration::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

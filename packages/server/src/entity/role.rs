use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Full access, including result corrections and deletions.
pub const ADMIN: &str = "admin";
/// Data entry and read access.
pub const MANAGER: &str = "manager";

/// A staff role. Rows are seeded on startup; there is no API to add roles.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub description: String,

    #[sea_orm(has_many)]
    pub staff: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub grants: HasMany<super::role_permission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

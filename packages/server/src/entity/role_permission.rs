use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One permission granted to a role, e.g. `("manager", "result:create")`.
///
/// Permission strings are `<area>:<action>`; handlers check them through
/// `AuthUser::require_permission`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_permission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub permission: String,
    #[sea_orm(belongs_to, from = "role", to = "name")]
    pub granted_to: HasOne<super::role::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

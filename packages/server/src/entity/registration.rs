use ranking::CompetitionGroup;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A candidate's entry for one exam year.
///
/// Unique per `(exam_year_id, school_id, district_id, school_roll_no)`; the index
/// is created in `seed::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub full_name: String,
    /// One of: Male, Female, Other.
    pub gender: String,
    pub date_of_birth: Option<Date>,
    pub class: i32,
    /// Derived from `class` when the row is created and never re-derived.
    /// NULL for rows imported without a group.
    pub competition_group: Option<CompetitionGroup>,
    /// One of: Assamese, English.
    pub medium: String,
    pub school_roll_no: String,
    pub address: String,
    pub student_mobile: String,
    pub guardian_mobile: Option<String>,
    pub email: Option<String>,

    pub exam_year_id: i32,
    #[sea_orm(belongs_to, from = "exam_year_id", to = "id")]
    pub exam_year: HasOne<super::exam_year::Entity>,

    pub district_id: i32,
    #[sea_orm(belongs_to, from = "district_id", to = "id")]
    pub district: HasOne<super::district::Entity>,

    pub school_id: i32,
    #[sea_orm(belongs_to, from = "school_id", to = "id")]
    pub school: HasOne<super::school::Entity>,

    #[sea_orm(has_one)]
    pub result: HasOne<super::exam_result::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

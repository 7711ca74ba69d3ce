use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, sea_query::LockType};

use crate::entity::{district, exam_result, exam_year, registration, school};
use crate::error::AppError;

/// Look up a district by ID, returning 404 if not found.
pub async fn find_district<C: ConnectionTrait>(db: &C, id: i32) -> Result<district::Model, AppError> {
    district::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("District not found".into()))
}

/// Look up a district by name, ignoring case and surrounding whitespace.
pub async fn find_district_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> Result<district::Model, AppError> {
    district::Entity::find()
        .filter(
            Expr::expr(Func::lower(Expr::col(district::Column::Name)))
                .eq(name.trim().to_lowercase()),
        )
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("District not found".into()))
}

pub async fn find_school<C: ConnectionTrait>(db: &C, id: i32) -> Result<school::Model, AppError> {
    school::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".into()))
}

/// Look up a school by name within a district, ignoring case.
pub async fn find_school_by_name<C: ConnectionTrait>(
    db: &C,
    district_id: i32,
    name: &str,
) -> Result<school::Model, AppError> {
    school::Entity::find()
        .filter(school::Column::DistrictId.eq(district_id))
        .filter(
            Expr::expr(Func::lower(Expr::col(school::Column::Name)))
                .eq(name.trim().to_lowercase()),
        )
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".into()))
}

pub async fn find_exam_year<C: ConnectionTrait>(db: &C, id: i32) -> Result<exam_year::Model, AppError> {
    exam_year::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam year not found".into()))
}

/// Look up an exam year by its calendar year.
pub async fn find_exam_year_by_year<C: ConnectionTrait>(
    db: &C,
    year: i32,
) -> Result<exam_year::Model, AppError> {
    exam_year::Entity::find()
        .filter(exam_year::Column::Year.eq(year))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Exam year {year} not found")))
}

pub async fn find_registration<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<registration::Model, AppError> {
    registration::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".into()))
}

pub async fn find_result<C: ConnectionTrait>(db: &C, id: i32) -> Result<exam_result::Model, AppError> {
    exam_result::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Result not found".into()))
}

/// Same as [`find_result`] but takes a row lock for the rest of the transaction.
pub async fn find_result_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<exam_result::Model, AppError> {
    exam_result::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Result not found".into()))
}

pub async fn find_district_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<district::Model, AppError> {
    district::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("District not found".into()))
}

pub async fn find_school_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<school::Model, AppError> {
    school::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("School not found".into()))
}

pub async fn find_exam_year_for_update<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<exam_year::Model, AppError> {
    exam_year::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam year not found".into()))
}

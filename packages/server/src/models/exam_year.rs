use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{ACTIVE, ARCHIVED, validate_one_of};
use crate::error::AppError;

const STATUSES: &[&str] = &[ACTIVE, ARCHIVED];

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateExamYearRequest {
    #[schema(example = 2025)]
    pub year: i32,
    /// `YYYY-MM-DD`.
    pub registration_open_date: NaiveDate,
    pub registration_close_date: NaiveDate,
    pub exam_date: NaiveDate,
    pub result_date: NaiveDate,
    /// `active` (default) or `archived`.
    pub status: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateExamYearRequest {
    pub registration_open_date: Option<NaiveDate>,
    pub registration_close_date: Option<NaiveDate>,
    pub exam_date: Option<NaiveDate>,
    pub result_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExamYearResponse {
    pub id: i32,
    pub year: i32,
    pub registration_open_date: NaiveDate,
    pub registration_close_date: NaiveDate,
    pub exam_date: NaiveDate,
    pub result_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::exam_year::Model> for ExamYearResponse {
    fn from(m: crate::entity::exam_year::Model) -> Self {
        Self {
            id: m.id,
            year: m.year,
            registration_open_date: m.registration_open_date,
            registration_close_date: m.registration_close_date,
            exam_date: m.exam_date,
            result_date: m.result_date,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Registration must not close before it opens.
pub fn validate_registration_window(open: NaiveDate, close: NaiveDate) -> Result<(), AppError> {
    if close < open {
        return Err(AppError::Validation(
            "registration_close_date must not be before registration_open_date".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_exam_year(req: &CreateExamYearRequest) -> Result<(), AppError> {
    if !(2020..=2100).contains(&req.year) {
        return Err(AppError::Validation(
            "Year must be between 2020 and 2100".into(),
        ));
    }
    validate_registration_window(req.registration_open_date, req.registration_close_date)?;
    if let Some(ref status) = req.status {
        validate_one_of("status", status, STATUSES)?;
    }
    Ok(())
}

pub fn validate_update_exam_year(req: &UpdateExamYearRequest) -> Result<(), AppError> {
    if let Some(ref status) = req.status {
        validate_one_of("status", status, STATUSES)?;
    }
    if let (Some(open), Some(close)) = (req.registration_open_date, req.registration_close_date) {
        validate_registration_window(open, close)?;
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use ranking::{ResultStatus, ScorePatch, SubjectScores};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::error::AppError;

/// Marks for one registration. Total and percentage are always computed.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateResultRequest {
    pub registration_id: i32,
    #[serde(flatten)]
    pub scores: SubjectScores,
}

pub fn validate_scores(scores: &SubjectScores) -> Result<(), AppError> {
    match scores.out_of_range() {
        Some((subject, value)) => Err(AppError::Validation(format!(
            "{subject} must be between 0 and 100, got {value}"
        ))),
        None => Ok(()),
    }
}

pub fn validate_score_patch(patch: &ScorePatch) -> Result<(), AppError> {
    for (subject, value) in patch.supplied() {
        if !(0..=ranking::MAX_SUBJECT_SCORE).contains(&value) {
            return Err(AppError::Validation(format!(
                "{subject} must be between 0 and 100, got {value}"
            )));
        }
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResultResponse {
    pub id: i32,
    pub registration_id: i32,
    pub exam_year_id: i32,
    #[serde(flatten)]
    pub scores: SubjectScores,
    #[schema(example = 420)]
    pub total: i32,
    #[schema(example = 84.0)]
    pub percentage: f64,
    pub result_status: ResultStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::exam_result::Model> for ResultResponse {
    fn from(m: crate::entity::exam_result::Model) -> Self {
        Self {
            id: m.id,
            registration_id: m.registration_id,
            exam_year_id: m.exam_year_id,
            scores: m.scores(),
            total: m.total,
            percentage: m.percentage,
            result_status: ResultStatus::from_total(m.total),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub exam_year_id: Option<i32>,
    pub district_id: Option<i32>,
    pub school_id: Option<i32>,
    pub class: Option<i32>,
    /// `A` or `B`.
    pub group: Option<String>,
    /// One of: created_at (default), total, percentage.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResultListResponse {
    pub data: Vec<ResultResponse>,
    pub pagination: Pagination,
}

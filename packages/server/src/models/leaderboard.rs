use ranking::{CompetitionGroup, GroupKey, GroupToppers, LeaderboardEntry, ResultRecord, ResultStatus, Topper};
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::error::AppError;

/// Toppers shown when the caller does not ask for a specific count.
pub const DEFAULT_TOPPER_LIMIT: usize = 3;
pub const MAX_TOPPER_LIMIT: usize = 100;

/// Parse a `group` query value: `A`/`B`, or a class number for rows that
/// predate group assignment.
pub fn parse_group(raw: &str) -> Result<GroupKey, AppError> {
    let raw = raw.trim();
    if let Ok(group) = raw.to_ascii_uppercase().parse::<CompetitionGroup>() {
        return Ok(GroupKey::Competition(group));
    }
    match raw.parse::<i32>() {
        Ok(class) if (1..=12).contains(&class) => Ok(GroupKey::RawClass(class)),
        _ => Err(AppError::Validation(format!(
            "Invalid group '{raw}'. Valid values: A, B, or a class number 1-12"
        ))),
    }
}

pub fn parse_optional_group(raw: Option<&str>) -> Result<Option<GroupKey>, AppError> {
    raw.map(parse_group).transpose()
}

/// Parse a `group` filter that must name a competition group.
pub fn parse_competition_group(raw: &str) -> Result<CompetitionGroup, AppError> {
    raw.trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(|e: ranking::ParseGroupError| AppError::Validation(e.to_string()))
}

pub fn resolve_limit(limit: Option<usize>) -> Result<usize, AppError> {
    let limit = limit.unwrap_or(DEFAULT_TOPPER_LIMIT);
    if !(1..=MAX_TOPPER_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_TOPPER_LIMIT}"
        )));
    }
    Ok(limit)
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GlobalToppersQuery {
    pub exam_year_id: i32,
    /// `A`, `B`, or a class number 1-12 for results without a group.
    /// Ranks stay global when filtered.
    pub group: Option<String>,
    /// Cutoff before ties are included (default 3).
    pub limit: Option<usize>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SchoolToppersQuery {
    pub exam_year_id: i32,
    pub school_id: i32,
    /// `A`, `B`, or a class number 1-12 for results without a group.
    pub group: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FullLeaderboardQuery {
    pub exam_year_id: i32,
    /// `A`, `B`, or a class number 1-12 for results without a group.
    pub group: Option<String>,
    pub school_id: Option<i32>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ToppersResponse {
    pub exam_year_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupKey>,
    pub toppers: Vec<Topper>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FullLeaderboardResponse {
    pub exam_year_id: i32,
    pub data: Vec<LeaderboardEntry>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublicYearQuery {
    /// Calendar year of the exam, e.g. 2025.
    pub year: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TopByGroupResponse {
    pub year: i32,
    pub groups: Vec<GroupToppers>,
}

/// Either `school_id`, or `district` and `school` names (case-insensitive).
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BySchoolQuery {
    pub year: i32,
    pub school_id: Option<i32>,
    pub district: Option<String>,
    pub school: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BySchoolResponse {
    pub year: i32,
    pub school_id: i32,
    pub school_name: String,
    pub district_name: String,
    pub results: Vec<LeaderboardEntry>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResultLookupQuery {
    pub year: i32,
    pub district: String,
    pub school: String,
    pub roll_no: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResultLookupResponse {
    pub rank_global: u32,
    pub result_status: ResultStatus,
    /// School medium, `Both` when the school did not record one.
    pub medium: String,
    #[serde(flatten)]
    pub record: ResultRecord,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HallOfFameQuery {
    pub year: i32,
    /// `A` or `B`. Class numbers are not accepted; the hall of fame lists group winners only.
    pub group: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HallOfFameResponse {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupKey>,
    pub toppers: Vec<Topper>,
}

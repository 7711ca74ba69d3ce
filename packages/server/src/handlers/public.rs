//! Unauthenticated read endpoints addressed by calendar year.
//!
//! Every handler here counts against the client's public rate limit.

use axum::Json;
use axum::extract::{Query, State};
use ranking::{GroupKey, Scope};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{district, exam_year, registration, school};
use crate::error::{AppError, ErrorBody};
use crate::extractors::client_ip::ClientIp;
use crate::models::district::DistrictResponse;
use crate::models::exam_year::ExamYearResponse;
use crate::models::leaderboard::*;
use crate::models::school::{SchoolListQuery, SchoolResponse};
use crate::models::shared::ACTIVE;
use crate::state::AppState;
use crate::utils::lookup::{
    find_district, find_district_by_name, find_exam_year_by_year, find_school, find_school_by_name,
};
use crate::utils::result_store::load_records;

const NOT_PUBLISHED: &str = "Results not published yet";

fn throttle(state: &AppState, client: &ClientIp, route: &str) -> Result<(), AppError> {
    state
        .rate_limiter
        .check(&client.key(route), state.config.rate_limit.public_requests)
}

fn require_active(status: &str, what: &str) -> Result<(), AppError> {
    if status == ACTIVE {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{what} not found")))
    }
}

#[utoipa::path(
    get,
    path = "/refs/districts",
    tag = "Public",
    operation_id = "publicDistricts",
    summary = "Active districts",
    responses(
        (status = 200, description = "Active districts ordered by name", body = Vec<DistrictResponse>),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client))]
pub async fn active_districts(
    client: ClientIp,
    State(state): State<AppState>,
) -> Result<Json<Vec<DistrictResponse>>, AppError> {
    throttle(&state, &client, "refs")?;
    let rows = district::Entity::find()
        .filter(district::Column::Status.eq(ACTIVE))
        .order_by_asc(district::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/refs/schools",
    tag = "Public",
    operation_id = "publicSchools",
    summary = "Active schools",
    description = "Active schools ordered by name, optionally limited to one district.",
    params(SchoolListQuery),
    responses(
        (status = 200, description = "Active schools", body = Vec<SchoolResponse>),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, query))]
pub async fn active_schools(
    client: ClientIp,
    State(state): State<AppState>,
    Query(query): Query<SchoolListQuery>,
) -> Result<Json<Vec<SchoolResponse>>, AppError> {
    throttle(&state, &client, "refs")?;
    let mut select = school::Entity::find().filter(school::Column::Status.eq(ACTIVE));
    if let Some(district_id) = query.district_id {
        select = select.filter(school::Column::DistrictId.eq(district_id));
    }
    let rows = select
        .order_by_asc(school::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/exam-years",
    tag = "Public",
    operation_id = "publicExamYears",
    summary = "Exam years",
    responses(
        (status = 200, description = "Exam years, newest first", body = Vec<ExamYearResponse>),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client))]
pub async fn exam_years(
    client: ClientIp,
    State(state): State<AppState>,
) -> Result<Json<Vec<ExamYearResponse>>, AppError> {
    throttle(&state, &client, "refs")?;
    let rows = exam_year::Entity::find()
        .order_by_desc(exam_year::Column::Year)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/exam-year/active",
    tag = "Public",
    operation_id = "activeExamYear",
    summary = "Current exam year",
    description = "The most recent exam year with status `active`.",
    responses(
        (status = 200, description = "Active exam year", body = ExamYearResponse),
        (status = 404, description = "No active exam year (NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client))]
pub async fn active_exam_year(
    client: ClientIp,
    State(state): State<AppState>,
) -> Result<Json<ExamYearResponse>, AppError> {
    throttle(&state, &client, "refs")?;
    let model = exam_year::Entity::find()
        .filter(exam_year::Column::Status.eq(ACTIVE))
        .order_by_desc(exam_year::Column::Year)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active exam year".into()))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/results/top-by-group",
    tag = "Public",
    operation_id = "topByGroup",
    summary = "Top three of every group",
    description = "For each group present in the exam year, the top three candidates with ties at third place included. Groups appear in display order.",
    params(PublicYearQuery),
    responses(
        (status = 200, description = "Toppers per group", body = TopByGroupResponse),
        (status = 404, description = "Exam year not found (NOT_FOUND) or no results yet (NO_RESULTS)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, query), fields(year = query.year))]
pub async fn top_by_group(
    client: ClientIp,
    State(state): State<AppState>,
    Query(query): Query<PublicYearQuery>,
) -> Result<Json<TopByGroupResponse>, AppError> {
    throttle(&state, &client, "results")?;
    let exam_year = find_exam_year_by_year(&state.db, query.year).await?;

    let records = load_records(&state.db, exam_year.id, None).await?;
    if records.is_empty() {
        return Err(AppError::NoResults(NOT_PUBLISHED.into()));
    }

    Ok(Json(TopByGroupResponse {
        year: exam_year.year,
        groups: ranking::toppers_by_group(&records, DEFAULT_TOPPER_LIMIT),
    }))
}

#[utoipa::path(
    get,
    path = "/results/by-school",
    tag = "Public",
    operation_id = "resultsBySchool",
    summary = "Ranked results of one school",
    description = "Every result of an active school in leaderboard order with PASS/FAIL. Address the school by `school_id`, or by `district` and `school` names (case-insensitive). A school without results yields an empty list.",
    params(BySchoolQuery),
    responses(
        (status = 200, description = "School results", body = BySchoolResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Exam year, district or school not found (NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, query), fields(year = query.year))]
pub async fn results_by_school(
    client: ClientIp,
    State(state): State<AppState>,
    Query(query): Query<BySchoolQuery>,
) -> Result<Json<BySchoolResponse>, AppError> {
    throttle(&state, &client, "results")?;
    let exam_year = find_exam_year_by_year(&state.db, query.year).await?;

    let (school, district) = match (query.school_id, &query.district, &query.school) {
        (Some(school_id), _, _) => {
            let school = find_school(&state.db, school_id).await?;
            require_active(&school.status, "School")?;
            let district = find_district(&state.db, school.district_id).await?;
            (school, district)
        }
        (None, Some(district_name), Some(school_name)) => {
            let district = find_district_by_name(&state.db, district_name).await?;
            require_active(&district.status, "District")?;
            let school = find_school_by_name(&state.db, district.id, school_name).await?;
            require_active(&school.status, "School")?;
            (school, district)
        }
        _ => {
            return Err(AppError::Validation(
                "Provide school_id, or both district and school".into(),
            ));
        }
    };

    let records = load_records(&state.db, exam_year.id, Some(school.id)).await?;
    let results = ranking::leaderboard(&records, Scope::School(school.id));

    Ok(Json(BySchoolResponse {
        year: exam_year.year,
        school_id: school.id,
        school_name: school.name,
        district_name: district.name,
        results,
    }))
}

#[utoipa::path(
    get,
    path = "/results/lookup",
    tag = "Public",
    operation_id = "resultLookup",
    summary = "Look up one candidate's result",
    description = "Finds a candidate by district name, school name and school roll number (all case-insensitive) and returns their result with the exam-year-wide rank.",
    params(ResultLookupQuery),
    responses(
        (status = 200, description = "Candidate result", body = ResultLookupResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Exam year, district, school or registration not found (NOT_FOUND), or result not published (NO_RESULTS)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, query), fields(year = query.year))]
pub async fn result_lookup(
    client: ClientIp,
    State(state): State<AppState>,
    Query(query): Query<ResultLookupQuery>,
) -> Result<Json<ResultLookupResponse>, AppError> {
    throttle(&state, &client, "lookup")?;
    let roll_no = query.roll_no.trim();
    if roll_no.is_empty() || query.district.trim().is_empty() || query.school.trim().is_empty() {
        return Err(AppError::Validation(
            "district, school and roll_no are required".into(),
        ));
    }

    let exam_year = find_exam_year_by_year(&state.db, query.year).await?;
    let district = find_district_by_name(&state.db, &query.district).await?;
    require_active(&district.status, "District")?;
    let school = find_school_by_name(&state.db, district.id, &query.school).await?;
    require_active(&school.status, "School")?;

    let reg = registration::Entity::find()
        .filter(registration::Column::ExamYearId.eq(exam_year.id))
        .filter(registration::Column::SchoolId.eq(school.id))
        .filter(
            Expr::expr(Func::lower(Expr::col(registration::Column::SchoolRollNo)))
                .eq(roll_no.to_lowercase()),
        )
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Registration not found for given roll number".into())
        })?;

    let records = load_records(&state.db, exam_year.id, None).await?;
    let record = records
        .iter()
        .find(|r| r.registration_id == reg.id)
        .ok_or_else(|| AppError::NoResults(NOT_PUBLISHED.into()))?;

    Ok(Json(ResultLookupResponse {
        rank_global: ranking::global_rank(&records, record),
        result_status: record.result_status(),
        medium: school.medium.clone().unwrap_or_else(|| "Both".into()),
        record: record.clone(),
    }))
}

#[utoipa::path(
    get,
    path = "/hall-of-fame",
    tag = "Public",
    operation_id = "hallOfFame",
    summary = "Top three of the exam year",
    description = "Top three candidates of the exam year, optionally within one group, ties at third place included. Ranks stay exam-year-wide. Empty when no results exist yet.",
    params(HallOfFameQuery),
    responses(
        (status = 200, description = "Hall of fame", body = HallOfFameResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Exam year not found (NOT_FOUND)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, query), fields(year = query.year))]
pub async fn hall_of_fame(
    client: ClientIp,
    State(state): State<AppState>,
    Query(query): Query<HallOfFameQuery>,
) -> Result<Json<HallOfFameResponse>, AppError> {
    throttle(&state, &client, "results")?;
    let group = query
        .group
        .as_deref()
        .map(parse_competition_group)
        .transpose()?
        .map(GroupKey::Competition);
    let exam_year = find_exam_year_by_year(&state.db, query.year).await?;

    let records = load_records(&state.db, exam_year.id, None).await?;

    Ok(Json(HallOfFameResponse {
        year: exam_year.year,
        group,
        toppers: ranking::global_toppers(&records, group, DEFAULT_TOPPER_LIMIT),
    }))
}

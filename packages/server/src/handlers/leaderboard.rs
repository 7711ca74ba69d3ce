use axum::Json;
use axum::extract::{Query, State};
use ranking::Scope;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::leaderboard::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::utils::lookup::{find_exam_year, find_school};
use crate::utils::result_store::load_records;

#[utoipa::path(
    get,
    path = "/global",
    tag = "Leaderboards",
    operation_id = "globalToppers",
    summary = "Top candidates of an exam year",
    description = "Top `limit` candidates by total, then mathematics, then science. Candidates tied with the last place are included. `rank_global` is computed over the whole exam year even when `group` filters the list. Requires `leaderboard:view` permission.",
    params(GlobalToppersQuery),
    responses(
        (status = 200, description = "Toppers, empty when no results exist", body = ToppersResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Exam year not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(exam_year_id = query.exam_year_id))]
pub async fn global_toppers(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<GlobalToppersQuery>,
) -> Result<Json<ToppersResponse>, AppError> {
    auth_user.require_permission("leaderboard:view")?;
    let group = parse_optional_group(query.group.as_deref())?;
    let limit = resolve_limit(query.limit)?;
    let exam_year = find_exam_year(&state.db, query.exam_year_id).await?;

    let records = load_records(&state.db, exam_year.id, None).await?;
    let toppers = ranking::global_toppers(&records, group, limit);

    Ok(Json(ToppersResponse {
        exam_year_id: exam_year.id,
        group,
        toppers,
    }))
}

#[utoipa::path(
    get,
    path = "/school",
    tag = "Leaderboards",
    operation_id = "schoolToppers",
    summary = "Top candidates of one school",
    description = "Top `limit` candidates of a school, ties at the cutoff included. `rank_school` is computed among that school's candidates only. Requires `leaderboard:view` permission.",
    params(SchoolToppersQuery),
    responses(
        (status = 200, description = "Toppers, empty when the school has no results", body = ToppersResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Exam year or school not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(exam_year_id = query.exam_year_id, school_id = query.school_id))]
pub async fn school_toppers(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SchoolToppersQuery>,
) -> Result<Json<ToppersResponse>, AppError> {
    auth_user.require_permission("leaderboard:view")?;
    let group = parse_optional_group(query.group.as_deref())?;
    let limit = resolve_limit(query.limit)?;
    let exam_year = find_exam_year(&state.db, query.exam_year_id).await?;
    let school = find_school(&state.db, query.school_id).await?;

    let records = load_records(&state.db, exam_year.id, Some(school.id)).await?;
    let toppers = ranking::school_toppers(&records, school.id, group, limit);

    Ok(Json(ToppersResponse {
        exam_year_id: exam_year.id,
        group,
        toppers,
    }))
}

#[utoipa::path(
    get,
    path = "/full",
    tag = "Leaderboards",
    operation_id = "fullLeaderboard",
    summary = "Full ranked leaderboard",
    description = "Every result of the exam year (or of one group, or of one school) in leaderboard order with PASS/FAIL status. Ranks are assigned before pagination so they do not restart per page. `group` and `school_id` are mutually exclusive. Requires `leaderboard:view` permission.",
    params(FullLeaderboardQuery),
    responses(
        (status = 200, description = "Leaderboard page", body = FullLeaderboardResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Exam year or school not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(exam_year_id = query.exam_year_id))]
pub async fn full_leaderboard(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FullLeaderboardQuery>,
) -> Result<Json<FullLeaderboardResponse>, AppError> {
    auth_user.require_permission("leaderboard:view")?;
    let group = parse_optional_group(query.group.as_deref())?;
    let (page, per_page) = Pagination::clamp(query.page, query.per_page);
    let exam_year = find_exam_year(&state.db, query.exam_year_id).await?;

    let (scope, school_filter) = match (group, query.school_id) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "group and school_id cannot be combined".into(),
            ));
        }
        (Some(group), None) => (Scope::Group(group), None),
        (None, Some(school_id)) => {
            let school = find_school(&state.db, school_id).await?;
            (Scope::School(school.id), Some(school.id))
        }
        (None, None) => (Scope::Global, None),
    };

    let records = load_records(&state.db, exam_year.id, school_filter).await?;
    let entries = ranking::leaderboard(&records, scope);

    let total = entries.len() as u64;
    let data = entries
        .into_iter()
        .skip(usize::try_from(Pagination::offset(page, per_page)).unwrap_or(usize::MAX))
        .take(per_page as usize)
        .collect();

    Ok(Json(FullLeaderboardResponse {
        exam_year_id: exam_year.id,
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ranking::{ScorePatch, compute_score};
use sea_orm::sea_query::Query as SeaQuery;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{exam_result, registration};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::leaderboard::parse_competition_group;
use crate::models::result::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::utils::lookup::{find_registration, find_result, find_result_for_update};

#[utoipa::path(
    post,
    path = "/",
    tag = "Results",
    operation_id = "createResult",
    summary = "Enter a result",
    description = "Records the five subject scores for a registration. Total and percentage are computed server-side. Requires `result:create` permission. Returns 409 when the registration already has a result.",
    request_body = CreateResultRequest,
    responses(
        (status = 201, description = "Result created", body = ResultResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Registration not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Result already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(registration_id = payload.registration_id))]
pub async fn create_result(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("result:create")?;
    validate_scores(&payload.scores)?;

    let reg = find_registration(&state.db, payload.registration_id).await?;

    let existing = exam_result::Entity::find()
        .filter(exam_result::Column::RegistrationId.eq(reg.id))
        .count(&state.db)
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(
            "Result already exists for this registration".into(),
        ));
    }

    let scores = payload.scores;
    let summary = compute_score(&scores);
    let now = chrono::Utc::now();
    let model = exam_result::ActiveModel {
        registration_id: Set(reg.id),
        exam_year_id: Set(reg.exam_year_id),
        gk: Set(scores.gk),
        science: Set(scores.science),
        mathematics: Set(scores.mathematics),
        logical_reasoning: Set(scores.logical_reasoning),
        current_affairs: Set(scores.current_affairs),
        total: Set(summary.total),
        percentage: Set(summary.percentage),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Result already exists for this registration".into())
        }
        _ => AppError::from(e),
    })?;

    tracing::info!(result_id = model.id, total = model.total, "Result created");
    Ok((StatusCode::CREATED, Json(ResultResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Results",
    operation_id = "listResults",
    summary = "List results",
    description = "Paginated list with filters. Requires `result:view` permission. Supports sorting by `created_at`, `total` or `percentage`.",
    params(ResultListQuery),
    responses(
        (status = 200, description = "Results", body = ResultListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_results(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ResultListQuery>,
) -> Result<Json<ResultListResponse>, AppError> {
    auth_user.require_permission("result:view")?;
    let (page, per_page) = Pagination::clamp(query.page, query.per_page);

    let sort_column = match query.sort_by.as_deref().unwrap_or("created_at") {
        "created_at" => exam_result::Column::CreatedAt,
        "total" => exam_result::Column::Total,
        "percentage" => exam_result::Column::Percentage,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, total, percentage".into(),
            ));
        }
    };
    let sort_order = if query.sort_order.as_deref() == Some("asc") {
        Order::Asc
    } else {
        Order::Desc
    };

    let mut select = exam_result::Entity::find();
    if let Some(id) = query.exam_year_id {
        select = select.filter(exam_result::Column::ExamYearId.eq(id));
    }

    // Candidate-side filters go through the registration table.
    let mut candidate = Condition::all();
    if let Some(id) = query.district_id {
        candidate = candidate.add(registration::Column::DistrictId.eq(id));
    }
    if let Some(id) = query.school_id {
        candidate = candidate.add(registration::Column::SchoolId.eq(id));
    }
    if let Some(class) = query.class {
        candidate = candidate.add(registration::Column::Class.eq(class));
    }
    if let Some(ref group) = query.group {
        let group = parse_competition_group(group)?;
        candidate = candidate.add(registration::Column::CompetitionGroup.eq(group));
    }
    if !candidate.is_empty() {
        select = select.filter(
            exam_result::Column::RegistrationId.in_subquery(
                SeaQuery::select()
                    .column(registration::Column::Id)
                    .from(registration::Entity)
                    .cond_where(candidate)
                    .to_owned(),
            ),
        );
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by(sort_column, sort_order)
        .order_by_asc(exam_result::Column::Id)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ResultListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Results",
    operation_id = "getResult",
    summary = "Get a result by ID",
    description = "Requires `result:view` permission.",
    params(("id" = i32, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result", body = ResultResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Result not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_result(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ResultResponse>, AppError> {
    auth_user.require_permission("result:view")?;
    Ok(Json(find_result(&state.db, id).await?.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Results",
    operation_id = "updateResult",
    summary = "Correct a result",
    description = "Overlays the supplied subject scores on the stored ones and recomputes total and percentage from the merged set. Requires `result:manage` permission. An empty payload returns the stored result unchanged.",
    params(("id" = i32, Path, description = "Result ID")),
    request_body = ScorePatch,
    responses(
        (status = 200, description = "Result updated", body = ResultResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Result not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_result(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ScorePatch>,
) -> Result<Json<ResultResponse>, AppError> {
    auth_user.require_permission("result:manage")?;
    validate_score_patch(&payload)?;

    if payload.is_empty() {
        return Ok(Json(find_result(&state.db, id).await?.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_result_for_update(&txn, id).await?;

    let merged = existing.scores().merge(&payload);
    let summary = compute_score(&merged);

    let mut active: exam_result::ActiveModel = existing.into();
    active.gk = Set(merged.gk);
    active.science = Set(merged.science);
    active.mathematics = Set(merged.mathematics);
    active.logical_reasoning = Set(merged.logical_reasoning);
    active.current_affairs = Set(merged.current_affairs);
    active.total = Set(summary.total);
    active.percentage = Set(summary.percentage);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(result_id = id, total = model.total, "Result updated");
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Results",
    operation_id = "deleteResult",
    summary = "Delete a result",
    description = "Requires `result:manage` permission.",
    params(("id" = i32, Path, description = "Result ID")),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Result not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_result(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("result:manage")?;

    let res = exam_result::Entity::delete_by_id(id).exec(&state.db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Result not found".into()));
    }
    tracing::info!(result_id = id, "Result deleted");
    Ok(StatusCode::NO_CONTENT)
}

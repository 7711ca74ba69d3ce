use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::exam_year;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::exam_year::*;
use crate::models::shared::ACTIVE;
use crate::state::AppState;
use crate::utils::lookup::{find_exam_year, find_exam_year_for_update};

#[utoipa::path(
    get,
    path = "/",
    tag = "Exam Years",
    operation_id = "listExamYears",
    summary = "List exam years",
    description = "Returns every exam year, newest first.",
    responses(
        (status = 200, description = "Exam years", body = Vec<ExamYearResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_exam_years(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ExamYearResponse>>, AppError> {
    let rows = exam_year::Entity::find()
        .order_by_desc(exam_year::Column::Year)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Exam Years",
    operation_id = "createExamYear",
    summary = "Create an exam year",
    description = "Requires `reference:create` permission. Returns 409 when the year already exists.",
    request_body = CreateExamYearRequest,
    responses(
        (status = 201, description = "Exam year created", body = ExamYearResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Duplicate year (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(year = payload.year))]
pub async fn create_exam_year(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateExamYearRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("reference:create")?;
    validate_create_exam_year(&payload)?;

    let now = chrono::Utc::now();
    let model = exam_year::ActiveModel {
        year: Set(payload.year),
        registration_open_date: Set(payload.registration_open_date),
        registration_close_date: Set(payload.registration_close_date),
        exam_date: Set(payload.exam_date),
        result_date: Set(payload.result_date),
        status: Set(payload.status.unwrap_or_else(|| ACTIVE.into())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("Exam year {} already exists", payload.year))
        }
        _ => AppError::from(e),
    })?;

    tracing::info!(exam_year_id = model.id, "Exam year created");
    Ok((StatusCode::CREATED, Json(ExamYearResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Exam Years",
    operation_id = "updateExamYear",
    summary = "Update an exam year",
    description = "Partially updates dates or status. Requires `reference:manage` permission. The registration window is checked against stored values when only one end changes.",
    params(("id" = i32, Path, description = "Exam year ID")),
    request_body = UpdateExamYearRequest,
    responses(
        (status = 200, description = "Exam year updated", body = ExamYearResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Exam year not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_exam_year(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateExamYearRequest>,
) -> Result<Json<ExamYearResponse>, AppError> {
    auth_user.require_permission("reference:manage")?;
    validate_update_exam_year(&payload)?;

    if payload == UpdateExamYearRequest::default() {
        return Ok(Json(find_exam_year(&state.db, id).await?.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_exam_year_for_update(&txn, id).await?;
    validate_registration_window(
        payload
            .registration_open_date
            .unwrap_or(existing.registration_open_date),
        payload
            .registration_close_date
            .unwrap_or(existing.registration_close_date),
    )?;

    let mut active: exam_year::ActiveModel = existing.into();
    if let Some(date) = payload.registration_open_date {
        active.registration_open_date = Set(date);
    }
    if let Some(date) = payload.registration_close_date {
        active.registration_close_date = Set(date);
    }
    if let Some(date) = payload.exam_date {
        active.exam_date = Set(date);
    }
    if let Some(date) = payload.result_date {
        active.result_date = Set(date);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{registration, school};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::school::*;
use crate::models::shared::ACTIVE;
use crate::state::AppState;
use crate::utils::lookup::{find_district, find_school, find_school_for_update};

fn duplicate_name(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A school with this name already exists in the district".into())
        }
        _ => e.into(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Schools",
    operation_id = "listSchools",
    summary = "List schools",
    description = "Returns schools ordered by name, optionally limited to one district.",
    params(SchoolListQuery),
    responses(
        (status = 200, description = "Schools", body = Vec<SchoolResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_schools(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SchoolListQuery>,
) -> Result<Json<Vec<SchoolResponse>>, AppError> {
    let mut select = school::Entity::find();
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
    post,
    path = "/",
    tag = "Schools",
    operation_id = "createSchool",
    summary = "Create a school",
    description = "Requires `reference:create` permission. The district must exist. Returns 409 when the district already has a school with this name.",
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "School created", body = SchoolResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "District not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name, district_id = payload.district_id))]
pub async fn create_school(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSchoolRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("reference:create")?;
    validate_create_school(&payload)?;
    find_district(&state.db, payload.district_id).await?;

    let now = chrono::Utc::now();
    let model = school::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        district_id: Set(payload.district_id),
        address: Set(payload.address.map(|a| a.trim().to_string())),
        medium: Set(payload.medium),
        status: Set(payload.status.unwrap_or_else(|| ACTIVE.into())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(duplicate_name)?;

    tracing::info!(school_id = model.id, "School created");
    Ok((StatusCode::CREATED, Json(SchoolResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Schools",
    operation_id = "updateSchool",
    summary = "Update a school",
    description = "Partially updates a school. Requires `reference:manage` permission.",
    params(("id" = i32, Path, description = "School ID")),
    request_body = UpdateSchoolRequest,
    responses(
        (status = 200, description = "School updated", body = SchoolResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "School or district not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_school(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateSchoolRequest>,
) -> Result<Json<SchoolResponse>, AppError> {
    auth_user.require_permission("reference:manage")?;
    validate_update_school(&payload)?;

    if payload == UpdateSchoolRequest::default() {
        return Ok(Json(find_school(&state.db, id).await?.into()));
    }

    let txn = state.db.begin().await?;
    let mut active: school::ActiveModel = find_school_for_update(&txn, id).await?.into();
    if let Some(district_id) = payload.district_id {
        find_district(&txn, district_id).await?;
        active.district_id = Set(district_id);
    }
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address.trim().to_string()));
    }
    if let Some(medium) = payload.medium {
        active.medium = Set(Some(medium));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await.map_err(duplicate_name)?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Schools",
    operation_id = "deleteSchool",
    summary = "Delete a school",
    description = "Requires `reference:manage` permission. Returns 409 while registrations reference the school.",
    params(("id" = i32, Path, description = "School ID")),
    responses(
        (status = 204, description = "School deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "School not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "School has registrations (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_school(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("reference:manage")?;

    let txn = state.db.begin().await?;
    find_school_for_update(&txn, id).await?;

    let registrations = registration::Entity::find()
        .filter(registration::Column::SchoolId.eq(id))
        .count(&txn)
        .await?;
    if registrations > 0 {
        return Err(AppError::Conflict(format!(
            "School still has {registrations} registration(s)"
        )));
    }

    school::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

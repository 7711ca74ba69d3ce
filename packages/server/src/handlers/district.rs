use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{district, school};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::district::*;
use crate::models::shared::ACTIVE;
use crate::state::AppState;
use crate::utils::lookup::{find_district, find_district_for_update};

fn duplicate_name(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("A district with this name already exists".into())
        }
        _ => e.into(),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Districts",
    operation_id = "listDistricts",
    summary = "List all districts",
    description = "Returns every district, active or not, ordered by name.",
    responses(
        (status = 200, description = "Districts", body = Vec<DistrictResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_districts(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DistrictResponse>>, AppError> {
    let rows = district::Entity::find()
        .order_by_asc(district::Column::Name)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Districts",
    operation_id = "createDistrict",
    summary = "Create a district",
    description = "Requires `reference:create` permission. Returns 409 when the name is taken.",
    request_body = CreateDistrictRequest,
    responses(
        (status = 201, description = "District created", body = DistrictResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_district(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDistrictRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("reference:create")?;
    validate_create_district(&payload)?;

    let now = chrono::Utc::now();
    let model = district::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        status: Set(payload.status.unwrap_or_else(|| ACTIVE.into())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(duplicate_name)?;

    tracing::info!(district_id = model.id, "District created");
    Ok((StatusCode::CREATED, Json(DistrictResponse::from(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Districts",
    operation_id = "updateDistrict",
    summary = "Update a district",
    description = "Partially updates a district. Requires `reference:manage` permission.",
    params(("id" = i32, Path, description = "District ID")),
    request_body = UpdateDistrictRequest,
    responses(
        (status = 200, description = "District updated", body = DistrictResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "District not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Duplicate name (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_district(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateDistrictRequest>,
) -> Result<Json<DistrictResponse>, AppError> {
    auth_user.require_permission("reference:manage")?;
    validate_update_district(&payload)?;

    if payload == UpdateDistrictRequest::default() {
        return Ok(Json(find_district(&state.db, id).await?.into()));
    }

    let txn = state.db.begin().await?;
    let mut active: district::ActiveModel = find_district_for_update(&txn, id).await?.into();
    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
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
    tag = "Districts",
    operation_id = "deleteDistrict",
    summary = "Delete a district",
    description = "Requires `reference:manage` permission. Returns 409 while schools still belong to the district.",
    params(("id" = i32, Path, description = "District ID")),
    responses(
        (status = 204, description = "District deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "District not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "District has schools (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_district(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("reference:manage")?;

    let txn = state.db.begin().await?;
    find_district_for_update(&txn, id).await?;

    let schools = school::Entity::find()
        .filter(school::Column::DistrictId.eq(id))
        .count(&txn)
        .await?;
    if schools > 0 {
        return Err(AppError::Conflict(format!(
            "District still has {schools} school(s)"
        )));
    }

    district::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

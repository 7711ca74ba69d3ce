use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use ranking::CompetitionGroup;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{district, exam_result, exam_year, registration, school};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::client_ip::ClientIp;
use crate::extractors::json::AppJson;
use crate::models::leaderboard::parse_competition_group;
use crate::models::registration::*;
use crate::models::shared::{ACTIVE, Pagination, escape_like};
use crate::state::AppState;
use crate::utils::lookup::find_registration;

const DUPLICATE_MESSAGE: &str =
    "A student with the same exam year, school, district and school roll number already exists";

#[utoipa::path(
    post,
    path = "/registrations",
    tag = "Public",
    operation_id = "createRegistration",
    summary = "Register a candidate",
    description = "Public intake form. The competition group is derived from the class and stored. District and school must be active and the school must belong to the district. Rate limited per client.",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Duplicate roll number (CONFLICT)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, payload), fields(client = %client.0, school_id = payload.school_id))]
pub async fn create_registration(
    client: ClientIp,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.rate_limiter.check(
        &client.key("registration"),
        state.config.rate_limit.registration_requests,
    )?;
    validate_create_registration(&payload)?;

    district::Entity::find_by_id(payload.district_id)
        .filter(district::Column::Status.eq(ACTIVE))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Validation("District not found or inactive".into()))?;
    school::Entity::find_by_id(payload.school_id)
        .filter(school::Column::DistrictId.eq(payload.district_id))
        .filter(school::Column::Status.eq(ACTIVE))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Validation("School not found or inactive in the specified district".into())
        })?;
    exam_year::Entity::find_by_id(payload.exam_year_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Validation("Exam year not found".into()))?;

    let roll_no = payload.school_roll_no.trim().to_string();
    let duplicate = registration::Entity::find()
        .filter(registration::Column::ExamYearId.eq(payload.exam_year_id))
        .filter(registration::Column::SchoolId.eq(payload.school_id))
        .filter(registration::Column::DistrictId.eq(payload.district_id))
        .filter(registration::Column::SchoolRollNo.eq(&roll_no))
        .count(&state.db)
        .await?;
    if duplicate > 0 {
        return Err(AppError::Conflict(DUPLICATE_MESSAGE.into()));
    }

    let group = CompetitionGroup::for_class(payload.class);
    let model = registration::ActiveModel {
        exam_year_id: Set(payload.exam_year_id),
        full_name: Set(payload.full_name.trim().to_string()),
        gender: Set(payload.gender.clone()),
        date_of_birth: Set(payload.date_of_birth),
        class: Set(payload.class),
        competition_group: Set(Some(group)),
        medium: Set(payload.medium.clone()),
        district_id: Set(payload.district_id),
        school_id: Set(payload.school_id),
        school_roll_no: Set(roll_no),
        address: Set(payload.address.trim().to_string()),
        student_mobile: Set(payload.student_mobile.trim().to_string()),
        guardian_mobile: Set(payload.guardian_mobile().map(str::to_string)),
        email: Set(payload.email().map(str::to_string)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        // Lost a race with a concurrent submission of the same roll number.
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(DUPLICATE_MESSAGE.into()),
        _ => AppError::from(e),
    })?;

    tracing::info!(registration_id = model.id, %group, "Registration created");
    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Registrations",
    operation_id = "listRegistrations",
    summary = "List registrations",
    description = "Paginated, newest first. Requires `registration:view` permission. `search` matches name or roll number, case-insensitive.",
    params(RegistrationListQuery),
    responses(
        (status = 200, description = "Registrations", body = RegistrationListResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_registrations(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    auth_user.require_permission("registration:view")?;
    let (page, per_page) = Pagination::clamp(query.page, query.per_page);

    let mut select = registration::Entity::find();
    if let Some(id) = query.exam_year_id {
        select = select.filter(registration::Column::ExamYearId.eq(id));
    }
    if let Some(id) = query.district_id {
        select = select.filter(registration::Column::DistrictId.eq(id));
    }
    if let Some(id) = query.school_id {
        select = select.filter(registration::Column::SchoolId.eq(id));
    }
    if let Some(class) = query.class {
        select = select.filter(registration::Column::Class.eq(class));
    }
    if let Some(ref group) = query.group {
        let group = parse_competition_group(group)?;
        select = select.filter(registration::Column::CompetitionGroup.eq(group));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(registration::Column::FullName)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(registration::Column::SchoolRollNo)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_desc(registration::Column::CreatedAt)
        .order_by_desc(registration::Column::Id)
        .offset(Some(Pagination::offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(RegistrationListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Registrations",
    operation_id = "getRegistration",
    summary = "Get a registration by ID",
    description = "Requires `registration:view` permission.",
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration", body = RegistrationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Registration not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_registration(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RegistrationResponse>, AppError> {
    auth_user.require_permission("registration:view")?;
    Ok(Json(find_registration(&state.db, id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Registrations",
    operation_id = "deleteRegistration",
    summary = "Delete a registration",
    description = "Deletes the registration together with its result. Requires `registration:delete` permission.",
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Registration not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_registration(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("registration:delete")?;

    let txn = state.db.begin().await?;
    find_registration(&txn, id).await?;

    exam_result::Entity::delete_many()
        .filter(exam_result::Column::RegistrationId.eq(id))
        .exec(&txn)
        .await?;
    registration::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(registration_id = id, "Registration deleted");
    Ok(StatusCode::NO_CONTENT)
}

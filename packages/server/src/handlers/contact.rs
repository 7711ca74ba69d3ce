use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::contact_message;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::client_ip::ClientIp;
use crate::extractors::json::AppJson;
use crate::models::contact::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/contact",
    tag = "Public",
    operation_id = "createContactMessage",
    summary = "Send a contact message",
    description = "Stores a message from the public contact form. Rate limited per client.",
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Message stored", body = ContactResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 429, description = "Rate limited (RATE_LIMITED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, client, payload), fields(client = %client.0))]
pub async fn create_contact_message(
    client: ClientIp,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .check(&client.key("contact"), state.config.rate_limit.public_requests)?;
    validate_create_contact(&payload)?;

    let model = contact_message::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        subject: Set(payload.subject.trim().to_string()),
        message: Set(payload.message.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(contact_id = model.id, "Contact message stored");
    Ok((StatusCode::CREATED, Json(ContactResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contacts",
    operation_id = "listContactMessages",
    summary = "List contact messages",
    description = "Newest first. Requires `contact:view` permission.",
    params(ContactListQuery),
    responses(
        (status = 200, description = "Contact messages", body = ContactListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_contact_messages(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ContactListResponse>, AppError> {
    auth_user.require_permission("contact:view")?;
    let (page, per_page) = Pagination::clamp(query.page, query.per_page);

    let paginator = contact_message::Entity::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .paginate(&state.db, per_page);
    let total = paginator.num_items().await?;
    let data = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ContactListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

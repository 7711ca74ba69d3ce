use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, is_valid_email, validate_len};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

pub fn validate_create_contact(req: &CreateContactRequest) -> Result<(), AppError> {
    validate_len("Name", &req.name, 2, 100)?;
    if !is_valid_email(req.email.trim()) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    validate_len("Subject", &req.subject, 5, 200)?;
    validate_len("Message", &req.message, 10, 2000)?;
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::contact_message::Model> for ContactResponse {
    fn from(m: crate::entity::contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            message: m.message,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactListResponse {
    pub data: Vec<ContactResponse>,
    pub pagination: Pagination,
}

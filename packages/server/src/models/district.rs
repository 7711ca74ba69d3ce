use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{ACTIVE, INACTIVE, validate_len, validate_one_of};
use crate::error::AppError;

const STATUSES: &[&str] = &[ACTIVE, INACTIVE];

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateDistrictRequest {
    /// District name (2-100 characters, unique).
    #[schema(example = "Kamrup")]
    pub name: String,
    /// `active` (default) or `inactive`.
    pub status: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateDistrictRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct DistrictResponse {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::district::Model> for DistrictResponse {
    fn from(m: crate::entity::district::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_district(req: &CreateDistrictRequest) -> Result<(), AppError> {
    validate_len("Name", &req.name, 2, 100)?;
    if let Some(ref status) = req.status {
        validate_one_of("status", status, STATUSES)?;
    }
    Ok(())
}

pub fn validate_update_district(req: &UpdateDistrictRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_len("Name", name, 2, 100)?;
    }
    if let Some(ref status) = req.status {
        validate_one_of("status", status, STATUSES)?;
    }
    Ok(())
}

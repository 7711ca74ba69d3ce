use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{ACTIVE, INACTIVE, validate_len, validate_one_of};
use crate::error::AppError;

const STATUSES: &[&str] = &[ACTIVE, INACTIVE];
const MEDIUMS: &[&str] = &["Assamese", "English", "Both"];

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSchoolRequest {
    /// School name (2-200 characters, unique within the district).
    #[schema(example = "Cotton Collegiate Govt. H.S. School")]
    pub name: String,
    pub district_id: i32,
    pub address: Option<String>,
    /// One of: Assamese, English, Both.
    pub medium: Option<String>,
    /// `active` (default) or `inactive`.
    pub status: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub district_id: Option<i32>,
    pub address: Option<String>,
    pub medium: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SchoolListQuery {
    /// Only schools in this district.
    pub district_id: Option<i32>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SchoolResponse {
    pub id: i32,
    pub name: String,
    pub district_id: i32,
    pub address: Option<String>,
    pub medium: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::school::Model> for SchoolResponse {
    fn from(m: crate::entity::school::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            district_id: m.district_id,
            address: m.address,
            medium: m.medium,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_optional_fields(
    address: Option<&str>,
    medium: Option<&str>,
    status: Option<&str>,
) -> Result<(), AppError> {
    if let Some(address) = address
        && address.chars().count() > 500
    {
        return Err(AppError::Validation(
            "Address must be at most 500 characters".into(),
        ));
    }
    if let Some(medium) = medium {
        validate_one_of("medium", medium, MEDIUMS)?;
    }
    if let Some(status) = status {
        validate_one_of("status", status, STATUSES)?;
    }
    Ok(())
}

pub fn validate_create_school(req: &CreateSchoolRequest) -> Result<(), AppError> {
    validate_len("Name", &req.name, 2, 200)?;
    if req.district_id <= 0 {
        return Err(AppError::Validation("district_id must be positive".into()));
    }
    validate_optional_fields(
        req.address.as_deref(),
        req.medium.as_deref(),
        req.status.as_deref(),
    )
}

pub fn validate_update_school(req: &UpdateSchoolRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_len("Name", name, 2, 200)?;
    }
    validate_optional_fields(
        req.address.as_deref(),
        req.medium.as_deref(),
        req.status.as_deref(),
    )
}

use chrono::{DateTime, NaiveDate, Utc};
use ranking::CompetitionGroup;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, is_valid_email, is_valid_mobile, validate_len, validate_one_of};
use crate::error::AppError;

const GENDERS: &[&str] = &["Male", "Female", "Other"];
const MEDIUMS: &[&str] = &["Assamese", "English"];

/// Public registration form.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRegistrationRequest {
    pub exam_year_id: i32,
    #[schema(example = "Priya Das")]
    pub full_name: String,
    /// One of: Male, Female, Other.
    #[schema(example = "Female")]
    pub gender: String,
    /// `YYYY-MM-DD`.
    pub date_of_birth: Option<NaiveDate>,
    /// 6 to 12. Determines the competition group.
    #[schema(example = 8)]
    pub class: i32,
    /// One of: Assamese, English.
    #[schema(example = "English")]
    pub medium: String,
    pub district_id: i32,
    pub school_id: i32,
    #[schema(example = "23")]
    pub school_roll_no: String,
    pub address: String,
    #[schema(example = "9876543210")]
    pub student_mobile: String,
    pub guardian_mobile: Option<String>,
    /// Empty string is treated as absent.
    pub email: Option<String>,
}

impl CreateRegistrationRequest {
    /// Email with blank values folded to `None`.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    pub fn guardian_mobile(&self) -> Option<&str> {
        self.guardian_mobile
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

pub fn validate_create_registration(req: &CreateRegistrationRequest) -> Result<(), AppError> {
    validate_len("Name", &req.full_name, 2, 100)?;
    validate_one_of("gender", &req.gender, GENDERS)?;
    if !(6..=12).contains(&req.class) {
        return Err(AppError::Validation("Class must be between 6 and 12".into()));
    }
    validate_one_of("medium", &req.medium, MEDIUMS)?;
    validate_len("School roll number", &req.school_roll_no, 1, 50)?;
    validate_len("Address", &req.address, 5, 500)?;
    if !is_valid_mobile(req.student_mobile.trim()) {
        return Err(AppError::Validation(
            "Invalid Indian mobile number for student_mobile".into(),
        ));
    }
    if let Some(mobile) = req.guardian_mobile()
        && !is_valid_mobile(mobile)
    {
        return Err(AppError::Validation(
            "Invalid Indian mobile number for guardian_mobile".into(),
        ));
    }
    if let Some(email) = req.email()
        && !is_valid_email(email)
    {
        return Err(AppError::Validation("Invalid email".into()));
    }
    Ok(())
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistrationResponse {
    pub id: i32,
    pub exam_year_id: i32,
    pub full_name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub class: i32,
    pub competition_group: Option<CompetitionGroup>,
    pub medium: String,
    pub district_id: i32,
    pub school_id: i32,
    pub school_roll_no: String,
    pub address: String,
    pub student_mobile: String,
    pub guardian_mobile: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::registration::Model> for RegistrationResponse {
    fn from(m: crate::entity::registration::Model) -> Self {
        Self {
            id: m.id,
            exam_year_id: m.exam_year_id,
            full_name: m.full_name,
            gender: m.gender,
            date_of_birth: m.date_of_birth,
            class: m.class,
            competition_group: m.competition_group,
            medium: m.medium,
            district_id: m.district_id,
            school_id: m.school_id,
            school_roll_no: m.school_roll_no,
            address: m.address,
            student_mobile: m.student_mobile,
            guardian_mobile: m.guardian_mobile,
            email: m.email,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub exam_year_id: Option<i32>,
    pub district_id: Option<i32>,
    pub school_id: Option<i32>,
    pub class: Option<i32>,
    /// `A` or `B`.
    pub group: Option<String>,
    /// Case-insensitive match on name or roll number.
    pub search: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistrationListResponse {
    pub data: Vec<RegistrationResponse>,
    pub pagination: Pagination,
}

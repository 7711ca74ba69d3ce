pub mod contact_message;
pub mod district;
pub mod exam_result;
pub mod exam_year;
pub mod registration;
pub mod role;
pub mod role_permission;
pub mod school;
pub mod user;

pub mod auth;
pub mod contact;
pub mod district;
pub mod exam_year;
pub mod leaderboard;
pub mod public;
pub mod registration;
pub mod result;
pub mod school;

mod common;

mod auth;
mod public;
mod result;

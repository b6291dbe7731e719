//! Users domain - registered authors.

pub mod activities;
pub mod models;

pub use models::{CreateUser, UpdateUser, User};

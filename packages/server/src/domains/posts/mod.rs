//! Posts domain - publishing and reading posts.

pub mod activities;
pub mod hashtags;
pub mod models;

pub use hashtags::extract_hashtags;
pub use models::{CreatePost, Post};

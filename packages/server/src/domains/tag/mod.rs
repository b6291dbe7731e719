//! Tag domain - hashtag registry and post back-links.

pub mod activities;
pub mod models;

pub use models::Tag;

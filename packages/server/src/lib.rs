// Hashpost - API Core
//
// This crate provides the backend API for a hashtag microblog: users publish
// posts, hashtags in a post's content become tags, and each tag keeps a list
// of the posts that use it.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;

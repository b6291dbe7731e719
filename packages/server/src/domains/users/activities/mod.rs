pub mod author;
pub mod core;

pub use author::validate_author;
pub use core::{create_user, delete_user, list_users, update_user};

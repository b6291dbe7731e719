// Business domains
pub mod posts;
pub mod tag;
pub mod users;

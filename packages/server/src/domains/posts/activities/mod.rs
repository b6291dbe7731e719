pub mod core;
pub mod publish;

pub use core::{delete_post, get_post, list_posts, posts_by_author};
pub use publish::{publish_post, publish_post_with, relink_post, PublishOptions};

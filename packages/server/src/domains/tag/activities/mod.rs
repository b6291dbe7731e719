pub mod dereference;
pub mod linker;
pub mod registry;

pub use dereference::posts_for_tag;
pub use linker::{link_post_to_tag, link_post_to_tags, LinkReport};
pub use registry::{create_tag, ensure_tag, list_tags};

use serde::{Deserialize, Serialize};

use crate::common::{PostId, TagId};

/// A hashtag and the posts that use it.
///
/// `name` is lowercase and unique. `posts` is a back-reference list that only
/// grows: deleting a post does not remove its id here, so readers must
/// tolerate ids that no longer resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub posts: Vec<PostId>,
}

impl Tag {
    /// A fresh tag with no posts yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            posts: Vec::new(),
        }
    }

    pub fn references(&self, post_id: PostId) -> bool {
        self.posts.contains(&post_id)
    }
}

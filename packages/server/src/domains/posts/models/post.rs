use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::PostId;

/// A published post.
///
/// `author` is a username (denormalized foreign key into `users`), and `tags`
/// holds the hashtags extracted from `content` at creation time, in order and
/// including repeats. Neither is updated after the insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for persisting a post.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreatePost {
    #[builder(setter(into))]
    pub author: String,
    #[builder(setter(into))]
    pub content: String,
    #[builder(default)]
    pub tags: Vec<String>,
}

impl Post {
    /// Build a new post document with a fresh id and both timestamps set to now.
    pub fn new(input: CreatePost) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            author: input.author,
            content: input.content,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Tag names in first-occurrence order with repeats removed.
    ///
    /// Registration and back-linking run once per entry of this list.
    pub fn distinct_tags(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.tags
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect()
    }
}

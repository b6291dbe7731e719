// Trait definitions for the document store
//
// These are INFRASTRUCTURE traits only - no business logic.
// Cross-collection rules (author checks, tag back-links) live in the domain
// activities that call these traits, never in the store implementations.
//
// Each method is a single round trip against one collection.

use async_trait::async_trait;

use crate::common::{PostId, StoreResult, UserId};
use crate::domains::posts::models::Post;
use crate::domains::tag::models::Tag;
use crate::domains::users::models::User;

// =============================================================================
// Filters
// =============================================================================

/// Selects documents in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    All,
    Username(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::Username(name) => user.username == *name,
        }
    }
}

/// Selects documents in the `posts` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Id(PostId),
    Author(String),
    /// Membership-set query used to dereference a tag's post list
    IdIn(Vec<PostId>),
}

impl PostFilter {
    /// Whether `post` is selected. `IdIn` scans the id list, so callers
    /// filtering many posts should build a set first, as the memory store does.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Id(id) => post.id == *id,
            PostFilter::Author(author) => post.author == *author,
            PostFilter::IdIn(ids) => ids.contains(&post.id),
        }
    }
}

/// Selects documents in the `tags` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    All,
    Name(String),
}

impl TagFilter {
    pub fn matches(&self, tag: &Tag) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Name(name) => tag.name == *name,
        }
    }
}

// =============================================================================
// Write results
// =============================================================================

/// Field changes applied by `update_user`. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Outcome of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    /// Documents selected by the filter
    pub matched: u64,
    /// Documents actually changed
    pub modified: u64,
}

/// Outcome of `insert_tag_if_absent`.
#[derive(Debug, Clone)]
pub struct TagUpsert {
    /// The stored tag, whether it was just created or already present
    pub tag: Tag,
    pub created: bool,
}

// =============================================================================
// Collection traits
// =============================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64>;

    /// Fails with `StoreError::Duplicate` if the username is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<UserId>;

    /// Update the first user matching `filter`.
    async fn update_user(&self, filter: &UserFilter, changes: &UserChanges)
        -> StoreResult<UpdateResult>;

    /// Delete the first user matching `filter`; returns the number deleted.
    async fn delete_user(&self, filter: &UserFilter) -> StoreResult<u64>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts matching `filter`, in insertion order.
    async fn find_posts(&self, filter: &PostFilter) -> StoreResult<Vec<Post>>;

    async fn insert_post(&self, post: &Post) -> StoreResult<PostId>;

    /// Delete the first post matching `filter`; returns the number deleted.
    async fn delete_post(&self, filter: &PostFilter) -> StoreResult<u64>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn find_tags(&self, filter: &TagFilter) -> StoreResult<Vec<Tag>>;

    async fn count_tags(&self, filter: &TagFilter) -> StoreResult<u64>;

    /// Plain insert. Fails with `StoreError::Duplicate` if the name exists.
    async fn insert_tag(&self, tag: &Tag) -> StoreResult<()>;

    /// Atomically insert `tag` unless a tag with the same name exists.
    ///
    /// Two concurrent calls with the same name observe exactly one `created`.
    async fn insert_tag_if_absent(&self, tag: &Tag) -> StoreResult<TagUpsert>;

    /// Add `post_id` to the `posts` list of the tag named `name`, unless it
    /// is already present.
    async fn add_post_to_tag(&self, name: &str, post_id: PostId) -> StoreResult<UpdateResult>;
}

/// Composite store trait holding all three collections.
#[async_trait]
pub trait DocumentStore: UserStore + PostStore + TagStore {
    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> StoreResult<()>;
}

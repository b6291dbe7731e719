//! In-memory document store for tests and local development.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::common::{PostId, StoreError, StoreResult, UserId};
use crate::domains::posts::models::Post;
use crate::domains::tag::models::Tag;
use crate::domains::users::models::User;
use crate::kernel::traits::{
    DocumentStore, PostFilter, PostStore, TagFilter, TagStore, TagUpsert, UpdateResult,
    UserChanges, UserFilter, UserStore,
};

/// In-memory storage for users, posts and tags.
///
/// Each collection is a `Vec` behind its own lock, so finds return documents
/// in insertion order. Data is lost on restart.
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    posts: RwLock<Vec<Post>>,
    tags: RwLock<Vec<Tag>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// A poisoned lock means a panic mid-write; surface it as an unavailable store.
fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::unavailable("memory store lock poisoned")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            posts: RwLock::new(Vec::new()),
            tags: RwLock::new(Vec::new()),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or_default()
    }

    pub fn post_count(&self) -> usize {
        self.posts.read().map(|p| p.len()).unwrap_or_default()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.read().map(|t| t.len()).unwrap_or_default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.iter().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn insert_user(&self, user: &User) -> StoreResult<UserId> {
        let mut users = self.users.write().map_err(poisoned)?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate {
                collection: "users",
                key: user.username.clone(),
            });
        }
        users.push(user.clone());
        Ok(user.id)
    }

    async fn update_user(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> StoreResult<UpdateResult> {
        let mut users = self.users.write().map_err(poisoned)?;
        let Some(user) = users.iter_mut().find(|u| filter.matches(u)) else {
            return Ok(UpdateResult::default());
        };

        let before = (user.email.clone(), user.password.clone(), user.updated_at);
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(password) = &changes.password {
            user.password = password.clone();
        }
        if let Some(updated_at) = changes.updated_at {
            user.updated_at = updated_at;
        }
        let after = (user.email.clone(), user.password.clone(), user.updated_at);

        Ok(UpdateResult {
            matched: 1,
            modified: u64::from(before != after),
        })
    }

    async fn delete_user(&self, filter: &UserFilter) -> StoreResult<u64> {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.iter().position(|u| filter.matches(u)) {
            Some(index) => {
                users.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_posts(&self, filter: &PostFilter) -> StoreResult<Vec<Post>> {
        let posts = self.posts.read().map_err(poisoned)?;
        if let PostFilter::IdIn(ids) = filter {
            let wanted: HashSet<PostId> = ids.iter().copied().collect();
            return Ok(posts
                .iter()
                .filter(|p| wanted.contains(&p.id))
                .cloned()
                .collect());
        }
        Ok(posts.iter().filter(|p| filter.matches(p)).cloned().collect())
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<PostId> {
        let mut posts = self.posts.write().map_err(poisoned)?;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(StoreError::Duplicate {
                collection: "posts",
                key: post.id.to_string(),
            });
        }
        posts.push(post.clone());
        Ok(post.id)
    }

    async fn delete_post(&self, filter: &PostFilter) -> StoreResult<u64> {
        let mut posts = self.posts.write().map_err(poisoned)?;
        match posts.iter().position(|p| filter.matches(p)) {
            Some(index) => {
                posts.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn find_tags(&self, filter: &TagFilter) -> StoreResult<Vec<Tag>> {
        let tags = self.tags.read().map_err(poisoned)?;
        Ok(tags.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn count_tags(&self, filter: &TagFilter) -> StoreResult<u64> {
        let tags = self.tags.read().map_err(poisoned)?;
        Ok(tags.iter().filter(|t| filter.matches(t)).count() as u64)
    }

    async fn insert_tag(&self, tag: &Tag) -> StoreResult<()> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        if tags.iter().any(|t| t.name == tag.name) {
            return Err(StoreError::Duplicate {
                collection: "tags",
                key: tag.name.clone(),
            });
        }
        tags.push(tag.clone());
        Ok(())
    }

    async fn insert_tag_if_absent(&self, tag: &Tag) -> StoreResult<TagUpsert> {
        // Check and insert under one write guard so concurrent callers serialize.
        let mut tags = self.tags.write().map_err(poisoned)?;
        if let Some(existing) = tags.iter().find(|t| t.name == tag.name) {
            return Ok(TagUpsert {
                tag: existing.clone(),
                created: false,
            });
        }
        tags.push(tag.clone());
        Ok(TagUpsert {
            tag: tag.clone(),
            created: true,
        })
    }

    async fn add_post_to_tag(&self, name: &str, post_id: PostId) -> StoreResult<UpdateResult> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        let Some(tag) = tags.iter_mut().find(|t| t.name == name) else {
            return Ok(UpdateResult::default());
        };
        if tag.references(post_id) {
            return Ok(UpdateResult {
                matched: 1,
                modified: 0,
            });
        }
        tag.posts.push(post_id);
        Ok(UpdateResult {
            matched: 1,
            modified: 1,
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::posts::models::CreatePost;
    use crate::domains::users::models::CreateUser;

    #[tokio::test]
    async fn insert_user_rejects_taken_username() {
        let store = MemoryStore::new();
        let alice = User::new(CreateUser::builder().username("alice").build());
        store.insert_user(&alice).await.unwrap();

        let again = User::new(CreateUser::builder().username("alice").build());
        let err = store.insert_user(&again).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { collection: "users", .. }));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn insert_tag_if_absent_returns_the_existing_document() {
        let store = MemoryStore::new();
        let first = store.insert_tag_if_absent(&Tag::new("rust")).await.unwrap();
        let second = store.insert_tag_if_absent(&Tag::new("rust")).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.tag.id, second.tag.id);
        assert_eq!(store.tag_count(), 1);
    }

    #[tokio::test]
    async fn add_post_to_tag_is_idempotent_and_reports_zero_match() {
        let store = MemoryStore::new();
        store.insert_tag(&Tag::new("go")).await.unwrap();
        let post_id = PostId::new();

        let first = store.add_post_to_tag("go", post_id).await.unwrap();
        let retry = store.add_post_to_tag("go", post_id).await.unwrap();
        let missing = store.add_post_to_tag("nope", post_id).await.unwrap();

        assert_eq!(first, UpdateResult { matched: 1, modified: 1 });
        assert_eq!(retry, UpdateResult { matched: 1, modified: 0 });
        assert_eq!(missing.matched, 0);

        let tags = store.find_tags(&TagFilter::Name("go".into())).await.unwrap();
        assert_eq!(tags[0].posts, vec![post_id]);
    }

    #[tokio::test]
    async fn id_in_filter_skips_unknown_ids() {
        let store = MemoryStore::new();
        let post = Post::new(CreatePost::builder().author("alice").content("hi").build());
        store.insert_post(&post).await.unwrap();

        let found = store
            .find_posts(&PostFilter::IdIn(vec![PostId::new(), post.id]))
            .await
            .unwrap();
        assert_eq!(found, vec![post]);
    }

    #[tokio::test]
    async fn id_in_filter_over_a_large_tag_list() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for i in 0..500 {
            let post = Post::new(
                CreatePost::builder()
                    .author("alice")
                    .content(format!("post {}", i))
                    .build(),
            );
            store.insert_post(&post).await.unwrap();
            if i % 2 == 0 {
                ids.push(post.id);
            }
        }
        // A tag list may hold the same id twice; each post comes back once
        ids.extend(ids.clone());
        ids.extend((0..1000).map(|_| PostId::new()));

        let found = store.find_posts(&PostFilter::IdIn(ids)).await.unwrap();
        assert_eq!(found.len(), 250);
        assert!(found.windows(2).all(|w| w[0].id != w[1].id));
    }

    #[tokio::test]
    async fn delete_post_removes_only_the_first_match() {
        let store = MemoryStore::new();
        for content in ["one", "two"] {
            let post = Post::new(CreatePost::builder().author("bob").content(content).build());
            store.insert_post(&post).await.unwrap();
        }

        let deleted = store
            .delete_post(&PostFilter::Author("bob".into()))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.post_count(), 1);
    }
}

//! Per-operation timeout decorator.
//!
//! Wraps any store so that every call is bounded by the same deadline,
//! mirroring a remote driver's per-call context. An elapsed call fails with
//! `StoreError::Timeout` and is otherwise indistinguishable from any other
//! store failure to the caller.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::common::{PostId, StoreError, StoreResult, UserId};
use crate::domains::posts::models::Post;
use crate::domains::tag::models::Tag;
use crate::domains::users::models::User;
use crate::kernel::traits::{
    DocumentStore, PostFilter, PostStore, TagFilter, TagStore, TagUpsert, UpdateResult,
    UserChanges, UserFilter, UserStore,
};

pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>> + Send,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    timeout: self.timeout,
                })
            }
        }
    }
}

#[async_trait]
impl<S: UserStore> UserStore for TimeoutStore<S> {
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        self.bounded("find_users", self.inner.find_users(filter)).await
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        self.bounded("count_users", self.inner.count_users(filter)).await
    }

    async fn insert_user(&self, user: &User) -> StoreResult<UserId> {
        self.bounded("insert_user", self.inner.insert_user(user)).await
    }

    async fn update_user(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> StoreResult<UpdateResult> {
        self.bounded("update_user", self.inner.update_user(filter, changes))
            .await
    }

    async fn delete_user(&self, filter: &UserFilter) -> StoreResult<u64> {
        self.bounded("delete_user", self.inner.delete_user(filter)).await
    }
}

#[async_trait]
impl<S: PostStore> PostStore for TimeoutStore<S> {
    async fn find_posts(&self, filter: &PostFilter) -> StoreResult<Vec<Post>> {
        self.bounded("find_posts", self.inner.find_posts(filter)).await
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<PostId> {
        self.bounded("insert_post", self.inner.insert_post(post)).await
    }

    async fn delete_post(&self, filter: &PostFilter) -> StoreResult<u64> {
        self.bounded("delete_post", self.inner.delete_post(filter)).await
    }
}

#[async_trait]
impl<S: TagStore> TagStore for TimeoutStore<S> {
    async fn find_tags(&self, filter: &TagFilter) -> StoreResult<Vec<Tag>> {
        self.bounded("find_tags", self.inner.find_tags(filter)).await
    }

    async fn count_tags(&self, filter: &TagFilter) -> StoreResult<u64> {
        self.bounded("count_tags", self.inner.count_tags(filter)).await
    }

    async fn insert_tag(&self, tag: &Tag) -> StoreResult<()> {
        self.bounded("insert_tag", self.inner.insert_tag(tag)).await
    }

    async fn insert_tag_if_absent(&self, tag: &Tag) -> StoreResult<TagUpsert> {
        self.bounded("insert_tag_if_absent", self.inner.insert_tag_if_absent(tag))
            .await
    }

    async fn add_post_to_tag(&self, name: &str, post_id: PostId) -> StoreResult<UpdateResult> {
        self.bounded("add_post_to_tag", self.inner.add_post_to_tag(name, post_id))
            .await
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn ping(&self) -> StoreResult<()> {
        self.bounded("ping", self.inner.ping()).await
    }
}

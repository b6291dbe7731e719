// TestDependencies - fault injection for store-level testing
//
// `FaultyStore` wraps a real store and can add latency, fail chosen
// operations, or fail the back-link for chosen tag names. It also records
// every call so tests can assert that nothing was written.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use crate::common::{PostId, StoreError, StoreResult, UserId};
use crate::domains::posts::models::Post;
use crate::domains::tag::models::Tag;
use crate::domains::users::models::User;
use crate::kernel::traits::{
    DocumentStore, PostFilter, PostStore, TagFilter, TagStore, TagUpsert, UpdateResult,
    UserChanges, UserFilter, UserStore,
};

/// Operations that write to a collection.
const WRITE_OPERATIONS: &[&str] = &[
    "insert_user",
    "update_user",
    "delete_user",
    "insert_post",
    "delete_post",
    "insert_tag",
    "insert_tag_if_absent",
    "add_post_to_tag",
];

pub struct FaultyStore<S> {
    inner: S,
    latency: Option<Duration>,
    failing_operations: Mutex<HashSet<&'static str>>,
    failing_links: Mutex<HashSet<String>>,
    failing_registrations: Mutex<HashSet<String>>,
    calls: Mutex<Vec<&'static str>>,
}

impl<S> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            latency: None,
            failing_operations: Mutex::new(HashSet::new()),
            failing_links: Mutex::new(HashSet::new()),
            failing_registrations: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay every call by `latency` before forwarding it.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail every call to `operation` (e.g. `"insert_post"`).
    pub fn with_failing_operation(self, operation: &'static str) -> Self {
        self.fail_operation(operation);
        self
    }

    /// Fail `add_post_to_tag` for the tag called `name`.
    pub fn with_failing_link(self, name: &str) -> Self {
        self.fail_link(name);
        self
    }

    /// Fail `insert_tag_if_absent` for the tag called `name`.
    pub fn with_failing_registration(self, name: &str) -> Self {
        if let Ok(mut names) = self.failing_registrations.lock() {
            names.insert(name.to_string());
        }
        self
    }

    pub fn fail_operation(&self, operation: &'static str) {
        if let Ok(mut ops) = self.failing_operations.lock() {
            ops.insert(operation);
        }
    }

    pub fn fail_link(&self, name: &str) {
        if let Ok(mut names) = self.failing_links.lock() {
            names.insert(name.to_string());
        }
    }

    /// Stop injecting any failures; latency is kept.
    pub fn heal(&self) {
        for set in [&self.failing_links, &self.failing_registrations] {
            if let Ok(mut names) = set.lock() {
                names.clear();
            }
        }
        if let Ok(mut ops) = self.failing_operations.lock() {
            ops.clear();
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Every operation called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Operations called so far that write to a collection.
    pub fn write_calls(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|op| WRITE_OPERATIONS.contains(op))
            .collect()
    }

    async fn enter(&self, operation: &'static str) -> StoreResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let failing = self
            .failing_operations
            .lock()
            .map(|ops| ops.contains(operation))
            .unwrap_or(false);
        if failing {
            return Err(injected(operation));
        }
        Ok(())
    }

    fn name_listed(set: &Mutex<HashSet<String>>, name: &str) -> bool {
        set.lock().map(|names| names.contains(name)).unwrap_or(false)
    }
}

fn injected(what: &str) -> StoreError {
    StoreError::unavailable(format!("injected failure: {}", what))
}

#[async_trait]
impl<S: UserStore> UserStore for FaultyStore<S> {
    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        self.enter("find_users").await?;
        self.inner.find_users(filter).await
    }

    async fn count_users(&self, filter: &UserFilter) -> StoreResult<u64> {
        self.enter("count_users").await?;
        self.inner.count_users(filter).await
    }

    async fn insert_user(&self, user: &User) -> StoreResult<UserId> {
        self.enter("insert_user").await?;
        self.inner.insert_user(user).await
    }

    async fn update_user(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> StoreResult<UpdateResult> {
        self.enter("update_user").await?;
        self.inner.update_user(filter, changes).await
    }

    async fn delete_user(&self, filter: &UserFilter) -> StoreResult<u64> {
        self.enter("delete_user").await?;
        self.inner.delete_user(filter).await
    }
}

#[async_trait]
impl<S: PostStore> PostStore for FaultyStore<S> {
    async fn find_posts(&self, filter: &PostFilter) -> StoreResult<Vec<Post>> {
        self.enter("find_posts").await?;
        self.inner.find_posts(filter).await
    }

    async fn insert_post(&self, post: &Post) -> StoreResult<PostId> {
        self.enter("insert_post").await?;
        self.inner.insert_post(post).await
    }

    async fn delete_post(&self, filter: &PostFilter) -> StoreResult<u64> {
        self.enter("delete_post").await?;
        self.inner.delete_post(filter).await
    }
}

#[async_trait]
impl<S: TagStore> TagStore for FaultyStore<S> {
    async fn find_tags(&self, filter: &TagFilter) -> StoreResult<Vec<Tag>> {
        self.enter("find_tags").await?;
        self.inner.find_tags(filter).await
    }

    async fn count_tags(&self, filter: &TagFilter) -> StoreResult<u64> {
        self.enter("count_tags").await?;
        self.inner.count_tags(filter).await
    }

    async fn insert_tag(&self, tag: &Tag) -> StoreResult<()> {
        self.enter("insert_tag").await?;
        self.inner.insert_tag(tag).await
    }

    async fn insert_tag_if_absent(&self, tag: &Tag) -> StoreResult<TagUpsert> {
        self.enter("insert_tag_if_absent").await?;
        if Self::name_listed(&self.failing_registrations, &tag.name) {
            return Err(injected(&format!("register tag '{}'", tag.name)));
        }
        self.inner.insert_tag_if_absent(tag).await
    }

    async fn add_post_to_tag(&self, name: &str, post_id: PostId) -> StoreResult<UpdateResult> {
        self.enter("add_post_to_tag").await?;
        if Self::name_listed(&self.failing_links, name) {
            return Err(injected(&format!("link tag '{}'", name)));
        }
        self.inner.add_post_to_tag(name, post_id).await
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FaultyStore<S> {
    async fn ping(&self) -> StoreResult<()> {
        self.enter("ping").await?;
        self.inner.ping().await
    }
}

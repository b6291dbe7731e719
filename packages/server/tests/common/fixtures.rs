//! Test fixtures for creating test data.
//!
//! These fixtures go straight to the store so they do not show up as calls
//! on the harness's `FaultyStore`.

use hashpost_core::domains::tag::models::Tag;
use hashpost_core::domains::users::models::{CreateUser, User};
use hashpost_core::kernel::{MemoryStore, TagFilter, TagStore, UserStore};

/// Create a user called `username`.
pub async fn create_test_user(store: &MemoryStore, username: &str) -> User {
    let user = User::new(
        CreateUser::builder()
            .username(username)
            .email(format!("{}@example.com", username))
            .password("password")
            .build(),
    );
    store
        .insert_user(&user)
        .await
        .expect("Failed to insert test user");
    user
}

/// Load the tag called `name`, if any.
pub async fn find_tag(store: &MemoryStore, name: &str) -> Option<Tag> {
    store
        .find_tags(&TagFilter::Name(name.to_string()))
        .await
        .expect("Failed to load tag")
        .into_iter()
        .next()
}

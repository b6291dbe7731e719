//! Integration tests for the tag registry and tag reads.

mod common;

use hashpost_core::common::CoreError;
use hashpost_core::domains::posts::activities::{delete_post, publish_post};
use hashpost_core::domains::tag::activities::{create_tag, ensure_tag, list_tags, posts_for_tag};
use test_context::test_context;

use crate::common::{create_test_user, find_tag, TestHarness};

#[test_context(TestHarness)]
#[tokio::test]
async fn test_concurrent_ensure_tag_creates_one_document(ctx: &TestHarness) {
    let mut handles = Vec::new();
    for _ in 0..32 {
        let deps = ctx.deps.clone();
        handles.push(tokio::spawn(async move { ensure_tag("race", &deps).await }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    assert_eq!(ctx.memory().tag_count(), 1);
    let stored = find_tag(ctx.memory(), "race").await.unwrap();
    assert!(ids.iter().all(|id| *id == stored.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publishes_share_one_tag() {
    let ctx = TestHarness::new();
    create_test_user(ctx.memory(), "alice").await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let deps = ctx.deps.clone();
        handles.push(tokio::spawn(async move {
            publish_post("alice", &format!("post {} #shared", i), &deps).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let tags = list_tags(&ctx.deps).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].posts.len(), 16);
    assert_eq!(posts_for_tag("shared", &ctx.deps).await.unwrap().len(), 16);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_unknown_tag_has_no_posts(ctx: &TestHarness) {
    let posts = posts_for_tag("doesnotexist", &ctx.deps).await.unwrap();
    assert!(posts.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_deleted_posts_are_skipped(ctx: &TestHarness) {
    create_test_user(ctx.memory(), "alice").await;
    let gone = publish_post("alice", "first #rust", &ctx.deps).await.unwrap();
    let kept = publish_post("alice", "second #rust", &ctx.deps).await.unwrap();

    delete_post(gone.id, &ctx.deps).await.unwrap();

    // The tag still references the deleted post
    assert_eq!(find_tag(ctx.memory(), "rust").await.unwrap().posts.len(), 2);

    let posts = posts_for_tag("rust", &ctx.deps).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, kept.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_tag_lookup_is_case_insensitive(ctx: &TestHarness) {
    create_test_user(ctx.memory(), "alice").await;
    let post = publish_post("alice", "#Rust", &ctx.deps).await.unwrap();

    let posts = posts_for_tag("RUST", &ctx.deps).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, post.id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_create_tag_conflicts_with_published_tag(ctx: &TestHarness) {
    create_test_user(ctx.memory(), "alice").await;
    publish_post("alice", "#taken", &ctx.deps).await.unwrap();

    let err = create_tag("taken", &ctx.deps).await.unwrap_err();
    assert!(matches!(err, CoreError::TagAlreadyExists { .. }));

    let fresh = create_tag("Fresh", &ctx.deps).await.unwrap();
    assert_eq!(fresh.name, "fresh");
    assert_eq!(ctx.memory().tag_count(), 2);
}

//! Post publishing
//!
//! The one cross-collection write in the system. In order:
//!
//! 1. validate the author exists (read-only)
//! 2. extract hashtags from the content
//! 3. register every distinct tag
//! 4. insert the post
//! 5. link the post id into each distinct tag
//!
//! Nothing is written before step 1 succeeds. A failure in step 3 can leave
//! freshly registered tags with no posts, which is harmless. A failure in
//! step 5 leaves a persisted post that some tags do not point back at yet;
//! that case is returned as `PartialLinkFailure` with the post attached so
//! the caller can run `relink_post` instead of publishing a duplicate.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, instrument, warn};

use crate::common::{CoreError, CoreResult, PostId, Step};
use crate::domains::posts::activities::core::get_post;
use crate::domains::posts::hashtags::extract_hashtags;
use crate::domains::posts::models::{CreatePost, Post};
use crate::domains::tag::activities::{ensure_tag, link_post_to_tag, link_post_to_tags, LinkReport};
use crate::domains::users::activities::validate_author;
use crate::kernel::ServerDeps;

/// Knobs for a single publish.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Checked before every step and every individual tag write. A step that
    /// has started runs to completion under the per-operation store timeout,
    /// so an expired deadline never leaves a write in an unknown state.
    pub deadline: Option<Instant>,
}

impl PublishOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }
}

fn check_deadline(options: &PublishOptions, step: Step, post: Option<&Post>) -> CoreResult<()> {
    match options.deadline {
        Some(deadline) if Instant::now() >= deadline => {
            warn!(step = %step, persisted = post.is_some(), "Publish deadline exceeded");
            Err(CoreError::DeadlineExceeded {
                step,
                post: post.cloned().map(Box::new),
            })
        }
        _ => Ok(()),
    }
}

/// Publish a post under the configured request deadline.
pub async fn publish_post(author: &str, content: &str, deps: &ServerDeps) -> CoreResult<Post> {
    publish_post_with(
        author,
        content,
        PublishOptions::with_timeout(deps.request_timeout),
        deps,
    )
    .await
}

#[instrument(skip(content, options, deps), fields(content_len = content.len()))]
pub async fn publish_post_with(
    author: &str,
    content: &str,
    options: PublishOptions,
    deps: &ServerDeps,
) -> CoreResult<Post> {
    check_deadline(&options, Step::ValidateAuthor, None)?;
    validate_author(author, deps).await?;

    let post = Post::new(
        CreatePost::builder()
            .author(author)
            .content(content)
            .tags(extract_hashtags(content))
            .build(),
    );
    let tags = post.distinct_tags();

    for name in &tags {
        check_deadline(&options, Step::RegisterTag, None)?;
        ensure_tag(name, deps).await?;
    }

    check_deadline(&options, Step::PersistPost, None)?;
    deps.store
        .insert_post(&post)
        .await
        .map_err(|e| CoreError::store(Step::PersistPost, e))?;
    info!(post_id = %post.id, author = %post.author, tags = tags.len(), "Post persisted");

    let mut report = LinkReport::default();
    for name in &tags {
        check_deadline(&options, Step::LinkTag, Some(&post))?;
        let outcome = link_post_to_tag(name, post.id, deps).await;
        report.record(name, outcome);
    }

    if report.is_complete() {
        info!(post_id = %post.id, "Post published");
    }
    report.into_result(post)
}

/// Re-register and re-link every tag of an existing post.
///
/// Repairs the state left behind by a `PartialLinkFailure` or an expired
/// deadline. Safe to run on a fully linked post.
#[instrument(skip(deps))]
pub async fn relink_post(post_id: PostId, deps: &ServerDeps) -> CoreResult<Post> {
    let post = get_post(post_id, deps).await?;
    let tags = post.distinct_tags();

    for name in &tags {
        ensure_tag(name, deps).await?;
    }
    let report = link_post_to_tags(&tags, post.id, deps).await;

    info!(
        post_id = %post.id,
        linked = report.linked.len(),
        failed = report.failed.len(),
        "Relinked post"
    );
    report.into_result(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::users::activities::create_user;
    use crate::domains::users::models::CreateUser;

    async fn deps_with_alice() -> ServerDeps {
        let deps = ServerDeps::in_memory();
        create_user(CreateUser::builder().username("alice").build(), &deps)
            .await
            .unwrap();
        deps
    }

    #[tokio::test]
    async fn publishes_and_links_every_tag() {
        let deps = deps_with_alice().await;

        let post = publish_post("alice", "Hello #World #rust", &deps).await.unwrap();
        assert_eq!(post.tags, vec!["world", "rust"]);

        for name in ["world", "rust"] {
            let tag = deps
                .store
                .find_tags(&crate::kernel::TagFilter::Name(name.into()))
                .await
                .unwrap()
                .remove(0);
            assert!(tag.references(post.id));
        }
    }

    #[tokio::test]
    async fn post_without_tags_touches_no_tags() {
        let deps = deps_with_alice().await;

        let post = publish_post("alice", "plain text", &deps).await.unwrap();
        assert!(post.tags.is_empty());
        assert_eq!(deps.store.count_tags(&crate::kernel::TagFilter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn expired_deadline_stops_before_any_read() {
        let deps = deps_with_alice().await;
        let options = PublishOptions {
            deadline: Some(Instant::now()),
        };

        let err = publish_post_with("alice", "#late", options, &deps)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::DeadlineExceeded {
                step: Step::ValidateAuthor,
                post: None
            }
        ));
    }

    #[tokio::test]
    async fn relink_is_a_noop_for_linked_posts() {
        let deps = deps_with_alice().await;
        let post = publish_post("alice", "#rust #rust", &deps).await.unwrap();

        let relinked = relink_post(post.id, &deps).await.unwrap();
        assert_eq!(relinked.id, post.id);

        let tag = deps
            .store
            .find_tags(&crate::kernel::TagFilter::Name("rust".into()))
            .await
            .unwrap()
            .remove(0);
        assert_eq!(tag.posts, vec![post.id]);
    }
}

//! Tag back-links: recording a post id in each of its tags.

use tracing::{debug, warn};

use crate::common::{CoreError, CoreResult, LinkFailure, LinkFailureKind, PostId};
use crate::domains::posts::models::Post;
use crate::kernel::ServerDeps;

/// Append `post_id` to the post list of the tag called `tag_name`.
///
/// Linking an already-linked post is a no-op. A tag that does not exist is
/// reported as `LinkFailureKind::TagNotFound` rather than silently skipped.
pub async fn link_post_to_tag(
    tag_name: &str,
    post_id: PostId,
    deps: &ServerDeps,
) -> Result<(), LinkFailure> {
    let result = deps
        .store
        .add_post_to_tag(tag_name, post_id)
        .await
        .map_err(|e| LinkFailure {
            tag: tag_name.to_string(),
            kind: LinkFailureKind::Store(e),
        })?;

    if result.matched == 0 {
        return Err(LinkFailure {
            tag: tag_name.to_string(),
            kind: LinkFailureKind::TagNotFound,
        });
    }
    if result.modified == 0 {
        debug!(tag = %tag_name, post_id = %post_id, "Post already linked to tag");
    }
    Ok(())
}

/// Outcome of linking one post to several tags.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub linked: Vec<String>,
    pub failed: Vec<LinkFailure>,
}

impl LinkReport {
    pub fn record(&mut self, tag: &str, outcome: Result<(), LinkFailure>) {
        match outcome {
            Ok(()) => self.linked.push(tag.to_string()),
            Err(failure) => {
                warn!(tag = %tag, error = %failure, "Failed to link post to tag");
                self.failed.push(failure);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Ok(post)` if every link landed, otherwise `PartialLinkFailure`
    /// carrying the post so the caller can retry the missing links.
    pub fn into_result(self, post: Post) -> CoreResult<Post> {
        if self.is_complete() {
            return Ok(post);
        }
        Err(CoreError::PartialLinkFailure {
            post: Box::new(post),
            linked: self.linked,
            failed: self.failed,
        })
    }
}

/// Link `post_id` to every tag in `tag_names`.
///
/// A failure on one tag does not stop the others from being attempted.
pub async fn link_post_to_tags(
    tag_names: &[String],
    post_id: PostId,
    deps: &ServerDeps,
) -> LinkReport {
    let mut report = LinkReport::default();
    for name in tag_names {
        let outcome = link_post_to_tag(name, post_id, deps).await;
        report.record(name, outcome);
    }
    report
}

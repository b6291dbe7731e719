//! Post reads and deletion.

use tracing::info;

use crate::common::{CoreError, CoreResult, PostId, Step};
use crate::domains::posts::models::Post;
use crate::domains::users::activities::validate_author;
use crate::kernel::{PostFilter, ServerDeps};

pub async fn list_posts(deps: &ServerDeps) -> CoreResult<Vec<Post>> {
    deps.store
        .find_posts(&PostFilter::All)
        .await
        .map_err(|e| CoreError::store(Step::LoadPosts, e))
}

pub async fn get_post(id: PostId, deps: &ServerDeps) -> CoreResult<Post> {
    deps.store
        .find_posts(&PostFilter::Id(id))
        .await
        .map_err(|e| CoreError::store(Step::LoadPosts, e))?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::PostNotFound { id: id.to_string() })
}

/// Posts written by `username`.
///
/// Posts outlive their author, so they are returned even after the user is
/// deleted. The author is only checked when no posts match: an unknown
/// author is an error, a known author with no posts gets an empty list.
pub async fn posts_by_author(username: &str, deps: &ServerDeps) -> CoreResult<Vec<Post>> {
    let posts = deps
        .store
        .find_posts(&PostFilter::Author(username.to_string()))
        .await
        .map_err(|e| CoreError::store(Step::LoadPosts, e))?;

    if posts.is_empty() {
        validate_author(username, deps).await?;
    }
    Ok(posts)
}

/// Delete a post. Tags keep the id in their post list; reads skip it.
pub async fn delete_post(id: PostId, deps: &ServerDeps) -> CoreResult<()> {
    let deleted = deps
        .store
        .delete_post(&PostFilter::Id(id))
        .await
        .map_err(|e| CoreError::store(Step::DeletePost, e))?;
    if deleted == 0 {
        return Err(CoreError::PostNotFound { id: id.to_string() });
    }

    info!(post_id = %id, "Deleted post");
    Ok(())
}

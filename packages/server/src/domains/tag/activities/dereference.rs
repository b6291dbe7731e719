//! Resolving a tag to the posts it references.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::common::{CoreError, CoreResult, PostId, Step};
use crate::domains::posts::models::Post;
use crate::kernel::{PostFilter, ServerDeps, TagFilter};

/// Posts referenced by the tag called `tag_name`.
///
/// The name is lowercased before lookup. An unknown tag and a tag with no
/// posts both give an empty list. Ids that no longer resolve (deleted posts)
/// are skipped. Results follow the order of the tag's post list.
pub async fn posts_for_tag(tag_name: &str, deps: &ServerDeps) -> CoreResult<Vec<Post>> {
    let name = tag_name.to_lowercase();

    let tag = deps
        .store
        .find_tags(&TagFilter::Name(name.clone()))
        .await
        .map_err(|e| CoreError::store(Step::LookupTag, e))?
        .into_iter()
        .next();

    let Some(tag) = tag else {
        info!(tag = %name, "Tag has no posts");
        return Ok(Vec::new());
    };
    if tag.posts.is_empty() {
        info!(tag = %name, "Tag has no posts");
        return Ok(Vec::new());
    }

    let mut posts = deps
        .store
        .find_posts(&PostFilter::IdIn(tag.posts.clone()))
        .await
        .map_err(|e| CoreError::store(Step::LoadPosts, e))?;

    if posts.len() < tag.posts.len() {
        debug!(
            tag = %name,
            referenced = tag.posts.len(),
            found = posts.len(),
            "Tag references posts that no longer exist"
        );
    }

    let mut position: HashMap<PostId, usize> = HashMap::with_capacity(tag.posts.len());
    for (i, id) in tag.posts.iter().enumerate() {
        position.entry(*id).or_insert(i);
    }
    posts.sort_by_key(|p| position.get(&p.id).copied().unwrap_or(usize::MAX));

    Ok(posts)
}

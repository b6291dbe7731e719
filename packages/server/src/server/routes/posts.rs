use axum::{
    extract::{Extension, Path},
    response::Response,
};
use serde_json::json;

use crate::common::{CoreError, PostId};
use crate::domains::posts::activities::{delete_post, get_post, list_posts, relink_post};
use crate::server::app::AppState;
use crate::server::response::ok;

fn parse_post_id(raw: &str) -> Result<PostId, CoreError> {
    PostId::parse(raw).map_err(|_| CoreError::InvalidInput(format!("invalid post id: {}", raw)))
}

pub async fn list_posts_handler(
    Extension(state): Extension<AppState>,
) -> Result<Response, CoreError> {
    let posts = list_posts(&state.deps).await?;
    Ok(ok(
        "Posts retrieved",
        json!({ "count": posts.len(), "posts": posts }),
    ))
}

pub async fn get_post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    let post = get_post(parse_post_id(&id)?, &state.deps).await?;
    Ok(ok("Post retrieved", json!({ "post": post })))
}

pub async fn delete_post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    let id = parse_post_id(&id)?;
    delete_post(id, &state.deps).await?;
    Ok(ok("Post deleted", json!({ "id": id })))
}

/// Retry the tag links of a post that was persisted but not fully linked.
pub async fn relink_post_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Response, CoreError> {
    let post = relink_post(parse_post_id(&id)?, &state.deps).await?;
    Ok(ok("Post relinked", json!({ "post": post })))
}

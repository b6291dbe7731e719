use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::common::CoreError;
use crate::domains::tag::activities::{create_tag, list_tags, posts_for_tag};
use crate::server::app::AppState;
use crate::server::response::{ok, success};

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

pub async fn list_tags_handler(
    Extension(state): Extension<AppState>,
) -> Result<Response, CoreError> {
    let tags = list_tags(&state.deps).await?;
    Ok(ok(
        "Tags retrieved",
        json!({ "count": tags.len(), "tags": tags }),
    ))
}

pub async fn create_tag_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreateTagRequest>,
) -> Result<Response, CoreError> {
    let tag = create_tag(&body.name, &state.deps).await?;
    Ok(success(
        StatusCode::CREATED,
        "Tag created",
        json!({ "tag": tag }),
    ))
}

pub async fn tag_posts_handler(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Result<Response, CoreError> {
    let posts = posts_for_tag(&name, &state.deps).await?;
    let message = if posts.is_empty() {
        "This tag has no posts"
    } else {
        "Posts retrieved"
    };
    Ok(ok(message, json!({ "count": posts.len(), "posts": posts })))
}

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::common::CoreError;
use crate::domains::posts::activities::{posts_by_author, publish_post};
use crate::domains::users::activities::{create_user, delete_user, list_users, update_user};
use crate::domains::users::models::{CreateUser, UpdateUser};
use crate::server::app::AppState;
use crate::server::response::{ok, success};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub content: String,
}

pub async fn create_user_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Response, CoreError> {
    let input = CreateUser::builder()
        .username(body.username)
        .email(body.email)
        .password(body.password)
        .build();
    let user = create_user(input, &state.deps).await?;

    Ok(success(
        StatusCode::CREATED,
        "User created",
        json!({ "user": user }),
    ))
}

pub async fn list_users_handler(
    Extension(state): Extension<AppState>,
) -> Result<Response, CoreError> {
    let users = list_users(&state.deps).await?;
    Ok(ok(
        "Users retrieved",
        json!({ "count": users.len(), "users": users }),
    ))
}

pub async fn update_user_handler(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Json(body): Json<UpdateUser>,
) -> Result<Response, CoreError> {
    let user = update_user(&username, body, &state.deps).await?;
    Ok(ok("User updated", json!({ "user": user })))
}

pub async fn delete_user_handler(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Response, CoreError> {
    delete_user(&username, &state.deps).await?;
    Ok(ok("User deleted", json!({ "username": username })))
}

/// Publish a post as `username`.
pub async fn publish_post_handler(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Json(body): Json<PublishRequest>,
) -> Result<Response, CoreError> {
    let post = publish_post(&username, &body.content, &state.deps).await?;
    Ok(success(
        StatusCode::CREATED,
        "Post created",
        json!({ "post": post }),
    ))
}

pub async fn user_posts_handler(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Response, CoreError> {
    let posts = posts_by_author(&username, &state.deps).await?;
    Ok(ok(
        "Posts retrieved",
        json!({ "count": posts.len(), "posts": posts }),
    ))
}

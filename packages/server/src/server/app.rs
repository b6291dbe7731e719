//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_tag_handler, create_user_handler, delete_post_handler, delete_user_handler,
    get_post_handler, health_handler, list_posts_handler, list_tags_handler, list_users_handler,
    not_found_handler, publish_post_handler, relink_post_handler, root_handler, tag_posts_handler,
    update_user_handler, user_posts_handler,
};

/// Slack between the publish deadline and the hard HTTP timeout, so the
/// publisher can report `DeadlineExceeded` before the connection is cut.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let http_timeout = deps.request_timeout + HTTP_TIMEOUT_SLACK;
    let app_state = AppState { deps };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Users
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route(
            "/users/:username",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route(
            "/users/:username/posts",
            post(publish_post_handler).get(user_posts_handler),
        )
        // Posts
        .route("/posts", get(list_posts_handler))
        .route(
            "/posts/:id",
            get(get_post_handler).delete(delete_post_handler),
        )
        .route("/posts/:id/relink", post(relink_post_handler))
        // Tags
        .route("/tags", get(list_tags_handler).post(create_tag_handler))
        .route("/tags/:name/posts", get(tag_posts_handler))
        .fallback(not_found_handler)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TimeoutLayer::new(http_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

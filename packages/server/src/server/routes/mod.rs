// HTTP routes
pub mod health;
pub mod posts;
pub mod tags;
pub mod users;

pub use health::*;
pub use posts::*;
pub use tags::*;
pub use users::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::server::response::ok;

pub async fn root_handler() -> Response {
    ok("Welcome to the hashpost API", Value::Null)
}

pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "failed", "error": "route not found" })),
    )
        .into_response()
}

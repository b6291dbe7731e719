//! JSON response envelope.
//!
//! Success bodies are `{"status": "success", "message": ..., <payload fields>}`.
//! Failures are `{"status": "failed", "error": ...}`, or `"partial"` when a
//! post was persisted but some of its tag links were not.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::error;

use crate::common::CoreError;

/// Build a success response. `payload` must be a JSON object (or null);
/// its fields are merged next to `status` and `message`.
pub fn success(status: StatusCode, message: impl Into<String>, payload: Value) -> Response {
    let mut body = Map::new();
    body.insert("status".into(), json!("success"));
    body.insert("message".into(), json!(message.into()));
    if let Value::Object(fields) = payload {
        body.extend(fields);
    }
    (status, Json(Value::Object(body))).into_response()
}

pub fn ok(message: impl Into<String>, payload: Value) -> Response {
    success(StatusCode::OK, message, payload)
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::AuthorNotFound { .. } | CoreError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            CoreError::UserNotFound { .. } | CoreError::PostNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CoreError::TagAlreadyExists { .. }
            | CoreError::UserAlreadyExists { .. }
            | CoreError::StoreConflict { .. } => StatusCode::CONFLICT,
            CoreError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CoreError::StoreTimeout { .. } | CoreError::DeadlineExceeded { .. } => {
                StatusCode::GATEWAY_TIMEOUT
            }
            CoreError::PartialLinkFailure { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, source = ?std::error::Error::source(&self), "Request failed");
        }

        let body = match &self {
            CoreError::PartialLinkFailure {
                post,
                linked,
                failed,
            } => json!({
                "status": "partial",
                "error": self.to_string(),
                "post": post,
                "linked": linked,
                "missing": failed.iter().map(|f| f.tag.as_str()).collect::<Vec<_>>(),
                "failures": failed.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            }),
            CoreError::DeadlineExceeded {
                post: Some(post), ..
            } => json!({
                "status": "partial",
                "error": self.to_string(),
                "post": post,
            }),
            _ => json!({
                "status": "failed",
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{LinkFailure, LinkFailureKind};
    use crate::domains::posts::models::{CreatePost, Post};

    #[test]
    fn status_codes_follow_error_kind() {
        let missing = CoreError::AuthorNotFound {
            author: "ghost".into(),
        };
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

        let taken = CoreError::TagAlreadyExists { name: "rust".into() };
        assert_eq!(taken.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn partial_failure_is_a_bad_gateway() {
        let post = Post::new(CreatePost::builder().author("alice").content("#a").build());
        let err = CoreError::PartialLinkFailure {
            post: Box::new(post),
            linked: vec![],
            failed: vec![LinkFailure {
                tag: "a".into(),
                kind: LinkFailureKind::TagNotFound,
            }],
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}

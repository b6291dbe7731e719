//! Typed errors for the store boundary and the publishing core.
//!
//! `StoreError` is what a single collection call can fail with. `CoreError`
//! is what the domain operations hand back to the HTTP layer; it records the
//! step that failed and, for failures after the post insert, the post that
//! was persisted anyway.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::domains::posts::models::Post;

/// Errors from a single document-store call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The call did not complete within the per-operation timeout
    #[error("store operation `{operation}` timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// Uniqueness violation on insert
    #[error("duplicate key in {collection}: {key}")]
    Duplicate {
        collection: &'static str,
        key: String,
    },

    /// Connection, query or decode failure
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn unavailable(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Unavailable(err.into())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The step of a core operation that a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ValidateAuthor,
    RegisterTag,
    PersistPost,
    LinkTag,
    LookupTag,
    LoadPosts,
    LoadTags,
    LoadUsers,
    SaveUser,
    DeleteUser,
    DeletePost,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ValidateAuthor => "validate_author",
            Step::RegisterTag => "register_tag",
            Step::PersistPost => "persist_post",
            Step::LinkTag => "link_tag",
            Step::LookupTag => "lookup_tag",
            Step::LoadPosts => "load_posts",
            Step::LoadTags => "load_tags",
            Step::LoadUsers => "load_users",
            Step::SaveUser => "save_user",
            Step::DeleteUser => "delete_user",
            Step::DeletePost => "delete_post",
        };
        f.write_str(name)
    }
}

/// Why a single tag back-link could not be written.
#[derive(Debug, Error)]
pub enum LinkFailureKind {
    /// The update matched no tag document
    #[error("no such tag")]
    TagNotFound,

    #[error("{0}")]
    Store(#[source] StoreError),
}

/// A back-link that failed for one tag of a persisted post.
#[derive(Debug, Error)]
#[error("tag '{tag}': {kind}")]
pub struct LinkFailure {
    pub tag: String,
    #[source]
    pub kind: LinkFailureKind,
}

/// Errors surfaced by the publishing core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("author does not exist: {author}")]
    AuthorNotFound { author: String },

    #[error("tag already exists: {name}")]
    TagAlreadyExists { name: String },

    #[error("user with the same username already exists: {username}")]
    UserAlreadyExists { username: String },

    #[error("user does not exist: {username}")]
    UserNotFound { username: String },

    #[error("post does not exist: {id}")]
    PostNotFound { id: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store timed out during {step}")]
    StoreTimeout {
        step: Step,
        #[source]
        source: StoreError,
    },

    #[error("store unavailable during {step}")]
    StoreUnavailable {
        step: Step,
        #[source]
        source: StoreError,
    },

    #[error("store rejected write during {step}")]
    StoreConflict {
        step: Step,
        #[source]
        source: StoreError,
    },

    /// The post is persisted but some tags do not point back at it yet.
    #[error("post {} persisted but {} tag link(s) failed", .post.id, .failed.len())]
    PartialLinkFailure {
        post: Box<Post>,
        linked: Vec<String>,
        failed: Vec<LinkFailure>,
    },

    /// The caller deadline expired; `post` is set when the insert already happened.
    #[error("deadline exceeded during {step}")]
    DeadlineExceeded {
        step: Step,
        post: Option<Box<Post>>,
    },
}

impl CoreError {
    /// Attribute a store failure to a step.
    pub fn store(step: Step, source: StoreError) -> Self {
        match source {
            StoreError::Timeout { .. } => CoreError::StoreTimeout { step, source },
            StoreError::Duplicate { .. } => CoreError::StoreConflict { step, source },
            StoreError::Unavailable(_) => CoreError::StoreUnavailable { step, source },
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CoreError::StoreTimeout { .. }
            | CoreError::StoreUnavailable { .. }
            | CoreError::DeadlineExceeded { .. } => true,
            CoreError::PartialLinkFailure { failed, .. } => failed
                .iter()
                .all(|f| matches!(f.kind, LinkFailureKind::Store(_))),
            _ => false,
        }
    }

    /// The post that was persisted before the failure, if any.
    ///
    /// Callers use this to retry only the missing links instead of
    /// republishing (which would create a second post).
    pub fn persisted_post(&self) -> Option<&Post> {
        match self {
            CoreError::PartialLinkFailure { post, .. } => Some(post),
            CoreError::DeadlineExceeded { post, .. } => post.as_deref(),
            _ => None,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

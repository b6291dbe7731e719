use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::UserId;

/// Registered author. Posts reference users by `username`, not by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Stored as given; never echoed back in responses
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a user.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateUser {
    pub username: String,
    #[builder(default)]
    pub email: String,
    #[builder(default)]
    pub password: String,
}

/// Partial update of a user's mutable fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl User {
    /// Build a new user document with a fresh id and both timestamps set to now.
    pub fn new(input: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: input.username,
            email: input.email,
            password: input.password,
            created_at: now,
            updated_at: now,
        }
    }
}

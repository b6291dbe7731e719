// Common types and utilities shared across the application

pub mod entity_ids;
pub mod errors;
pub mod id;

pub use entity_ids::{PostId, TagId, UserId};
pub use errors::{
    CoreError, CoreResult, LinkFailure, LinkFailureKind, Step, StoreError, StoreResult,
};
pub use id::Id;

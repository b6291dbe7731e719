//! Typed ID definitions for the three stored collections.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User documents.
pub struct User;

/// Marker type for Post documents.
pub struct Post;

/// Marker type for Tag documents.
pub struct Tag;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type PostId = Id<Post>;

pub type TagId = Id<Tag>;

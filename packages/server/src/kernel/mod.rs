//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ServerDeps, DEFAULT_REQUEST_TIMEOUT};
pub use stores::{MemoryStore, PostgresStore, TimeoutStore};
pub use test_dependencies::FaultyStore;
pub use traits::*;

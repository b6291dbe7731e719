//! Document store implementations.
//!
//! Available backends:
//! - `MemoryStore` - in-process collections (tests, local development)
//! - `PostgresStore` - PostgreSQL tables with array columns for references
//!
//! `TimeoutStore` wraps either one with a per-operation deadline.

pub mod memory;
pub mod postgres;
pub mod timeout;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use timeout::TimeoutStore;

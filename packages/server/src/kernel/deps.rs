//! Server dependencies for domain activities (using traits for testability)
//!
//! Activities take `&ServerDeps` rather than a concrete store, so tests can
//! swap in `MemoryStore` or a fault-injecting wrapper.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::kernel::stores::{MemoryStore, PostgresStore, TimeoutStore};
use crate::kernel::DocumentStore;

/// Deadline for a whole publish when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn DocumentStore>,
    /// Caller-level deadline applied around a whole publish
    pub request_timeout: Duration,
}

impl ServerDeps {
    pub fn new(store: Arc<dyn DocumentStore>, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
        }
    }

    /// Dependencies over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build dependencies from configuration.
    ///
    /// Uses Postgres when `DATABASE_URL` is set, otherwise an in-memory store.
    /// Either backend is wrapped with the per-operation store timeout.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(url) => {
                info!("Connecting to database...");
                let pg = PostgresStore::connect(url, config.database_max_connections)
                    .await
                    .context("Failed to connect to database")?;
                info!("Database connected");
                Arc::new(TimeoutStore::new(pg, config.store_timeout))
            }
            None => {
                info!("DATABASE_URL not set, using in-memory store");
                Arc::new(TimeoutStore::new(MemoryStore::new(), config.store_timeout))
            }
        };

        Ok(Self::new(store, config.request_timeout))
    }
}

//! Test harness for integration testing.
//!
//! Every test gets its own in-memory store wrapped in a `FaultyStore`, so
//! tests can inject failures and inspect the calls that reached the store.
//! Postgres-backed tests start their own container (see
//! `postgres_store_tests.rs`).

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use hashpost_core::kernel::{FaultyStore, MemoryStore, ServerDeps, DEFAULT_REQUEST_TIMEOUT};
use hashpost_core::server::build_app;
use test_context::AsyncTestContext;

/// Initialize tracing once per test binary.
///
/// Run tests with: RUST_LOG=debug cargo test -- --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let post = publish_post("alice", "#hello", &ctx.deps).await?;
/// }
/// ```
pub struct TestHarness {
    /// Store handle for fault injection and call inspection
    pub store: Arc<FaultyStore<MemoryStore>>,
    /// Dependencies to pass to activities
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Store is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_store(FaultyStore::new(MemoryStore::new()))
    }

    pub fn with_store(store: FaultyStore<MemoryStore>) -> Self {
        Self::with_store_and_timeout(store, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_store_and_timeout(store: FaultyStore<MemoryStore>, timeout: Duration) -> Self {
        init_tracing();
        let store = Arc::new(store);
        let deps = ServerDeps::new(store.clone(), timeout);
        Self { store, deps }
    }

    /// The underlying in-memory store, bypassing fault injection.
    pub fn memory(&self) -> &MemoryStore {
        self.store.inner()
    }

    /// Router over this harness's dependencies.
    pub fn router(&self) -> Router {
        build_app(self.deps.clone())
    }
}

//! Tracing setup for tests.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`, so
/// `RUST_LOG=aliastrack_core=debug cargo test` shows cache rebuilds.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

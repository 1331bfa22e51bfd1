//! Logging helpers
//!
//! The library emits `tracing` events and installs no subscriber of its own;
//! embedding applications usually bring theirs. These helpers cover binaries
//! and tests that want a reasonable default.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to `level`.
/// Safe to call more than once; later calls are no-ops.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize logging for tests (captured per test)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

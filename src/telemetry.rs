//! Tracing setup for test binaries.
//!
//! The crate only emits `tracing` events; these helpers install a subscriber
//! for test processes. Both are safe to call from every test: only the first
//! call in a process installs the subscriber. `RUST_LOG` overrides the default
//! filter.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_TEST_FILTER: &str = "info,kube=warn,rancher_e2e=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER))
}

/// Human-readable output routed through the test harness capture.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init();
}

/// JSON output, for CI runs whose logs are collected and indexed.
pub fn init_json_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_test_writer()
        .try_init();
}

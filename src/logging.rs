//! Tracing subscriber setup.
//!
//! The filter is read from `RUST_LOG` and defaults to `info`, e.g.
//! `RUST_LOG=u_slotting=debug` to see every placement step.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber for the command-line binary.
///
/// ```no_run
/// u_slotting::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber that writes through the test harness.
///
/// Safe to call from several tests.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

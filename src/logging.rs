//! Log subscriber setup.
//!
//! The crate only emits `tracing` events; binaries and tests that want to
//! see them install a subscriber here.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` selects levels (default: `info`), e.g.
/// `RUST_LOG=u_timetable=debug`. Returns `false` if a global subscriber was
/// already installed.
///
/// ```no_run
/// u_timetable::logging::init();
/// ```
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init()
        .is_ok()
}

/// Debug-level subscriber writing through the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

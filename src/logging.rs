//! Tracing setup shared by both binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a compact stdout subscriber filtered by `RUST_LOG`
/// (default `info`). Subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .try_init();
}

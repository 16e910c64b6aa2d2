//! Diagnostic logging setup.
//!
//! The library emits `tracing` events; the binary installs a stderr
//! subscriber filtered by `RUST_LOG` (default: `warn`).  Events carry
//! vault names and record ids only, never secrets or key material.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.  Calling it twice is harmless.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

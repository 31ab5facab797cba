//! Tracing subscriber setup
//!
//! The component crates only emit `tracing` events. An application that
//! embeds the engine installs a subscriber once, here or on its own.

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_directive` (e.g. `"info"` or
/// `"credence_lifecycle=debug"`) when `RUST_LOG` is unset or invalid.
/// Returns `false` if a global subscriber was already installed, so calling
/// it more than once is harmless.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

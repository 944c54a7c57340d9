//! Logging initialization.
//!
//! The engine emits `tracing` events around the spawn, drain, and exit
//! points of every run. Embedders that already install a subscriber get
//! those events through it; the helpers here are for binaries and tests
//! that want the crate's output without wiring tracing themselves.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shell_relay=info"))
}

/// Install the global tracing subscriber.
///
/// Filtering comes from the `RUST_LOG` environment variable, defaulting
/// to `shell_relay=info` when unset.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

/// Install the global tracing subscriber, returning an error instead of
/// panicking when one is already set.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
}

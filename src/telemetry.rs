//! Tracing setup for binaries and tests.
//!
//! The engine itself only emits `tracing` events; installing a subscriber
//! is the embedding application's job. [`init`] is a convenience for
//! examples and tests: an fmt subscriber filtered by `RUST_LOG`
//! (defaulting to `info`), safe to call more than once.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default fmt subscriber. Subsequent calls are no-ops, so
/// every test can call this without coordinating.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

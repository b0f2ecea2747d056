//! Subscriber setup for binaries and tests embedding the crate.
//!
//! Library code logs through the `log` facade; `init_logging` routes those
//! records into a `tracing` fmt subscriber so they share output with the
//! upload spans.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(true));

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::warn!("log records will not be forwarded: {}", e);
    }
    true
}

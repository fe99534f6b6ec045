//! Tracing setup for CI log output.
//!
//! All diagnostics go to stderr so stdout stays reserved for action outputs
//! when `GITHUB_OUTPUT` is not set.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `info` if unset, since the publisher
/// runs inside CI job logs where its progress lines are the primary feedback.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

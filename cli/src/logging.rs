//! Diagnostic logging setup.
//!
//! Progress for humans goes through `ProgressReporter`; this subscriber
//! carries the `tracing` events (every `cf` call, teardown outcomes) to
//! stderr so they never interleave with `--json` output on stdout.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))
}

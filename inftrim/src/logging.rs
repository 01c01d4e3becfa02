//! Diagnostic tracing for inftrim commands.
//!
//! Command results (diffs, removal logs, JSON reports) go to stdout. Tracing
//! output goes to stderr and is controlled by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, or `inftrim=debug` when
/// `verbose` is set.
///
/// # Example
/// ```bash
/// RUST_LOG=inftrim=debug inftrim prune --dry-run lib/wine/x86_64-windows
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "inftrim=debug" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

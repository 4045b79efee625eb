//! Diagnostic output setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber. Diagnostics go to stderr, so they
/// never mix with anything a caller captures from stdout.
pub fn init(levels: &str) {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(levels))
        .with_writer(std::io::stderr)
        .finish();

    // Ignore errors when setting, since tests can initialize this
    // multiple times.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

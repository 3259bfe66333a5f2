//! Tracing set-up for the binary.
//!
//! Logs go to stderr so they never interleave with the menu on stdout.

use tracing_subscriber::EnvFilter;

use crate::core::config::LoggingSettings;

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level.
/// An unparsable level falls back to `warn`.
pub fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Returns `false` if one was already set.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(settings))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

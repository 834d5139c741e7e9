//! Structured logging setup
//!
//! Diagnostics go to stderr so they never interleave with the chat
//! transcript on stdout. `RUST_LOG` takes precedence over the CLI flags.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::VeryVerbose => "debug",
    }
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call is ignored.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(matches!(verbosity, Verbosity::VeryVerbose))
        .with_writer(std::io::stderr)
        .try_init();
}

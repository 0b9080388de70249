//! Tracing subscriber setup.
//!
//! | Flag   | Filter level |
//! |--------|--------------|
//! | (none) | WARN         |
//! | `-v`   | INFO         |
//!
//! `RUST_LOG` overrides both.

use std::io::IsTerminal as _;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber, writing to stderr.
/// A subscriber that is already installed is left in place.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn level_for(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

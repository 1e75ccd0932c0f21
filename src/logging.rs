//! Logging to the terminal with colors

use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `info`.  Colors are only printed when stdout is
/// a terminal so redirected logs stay free of escape codes.
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(false)
        .compact()
        .init();
}

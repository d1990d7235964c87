//! Log output on stderr, alongside the completion line.

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` directives take precedence over
/// `default_level`.
pub fn init(default_level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

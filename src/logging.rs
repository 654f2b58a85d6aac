//! Diagnostic logging for subprocess invocations.
//!
//! User-facing messages go through [`crate::ui::OutputFormatter`]; this
//! module only wires `tracing` events to stderr. `HELPGEN_LOG` overrides
//! the level derived from `-v`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "HELPGEN_LOG";

#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 | 1 => "warn",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 3)
        .with_writer(std::io::stderr)
        .try_init();
}

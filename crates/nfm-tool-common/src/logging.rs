//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr so stdout carries only tool output.

use tracing_subscriber::{fmt, EnvFilter};

/// Maps a log level argument to a tracing filter directive.
///
/// Accepts level names (`error`, `warn`, `info`, `debug`, `trace`) or the
/// numeric verbosity levels 0-4, where 0 is `error` and 4 is `trace`.
pub fn level_directive(level: &str) -> Option<&'static str> {
    let level = level.trim();
    let directive = match level.to_ascii_lowercase().as_str() {
        "0" | "error" => "error",
        "1" | "warn" | "warning" => "warn",
        "2" | "info" => "info",
        "3" | "debug" => "debug",
        "4" | "trace" => "trace",
        _ => return None,
    };
    Some(directive)
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. An unrecognised level falls
/// back to `info`. Calling this more than once is harmless; later calls
/// leave the first subscriber in place.
pub fn init(level: &str) {
    let directive = level_directive(level).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

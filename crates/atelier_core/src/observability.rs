//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_VAR: &str = "ATELIER_LOG_FORMAT";

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to `default_directive` (e.g. `"info"`).
/// Output goes to stderr so command output on stdout stays clean.
/// Setting `ATELIER_LOG_FORMAT=json` switches to one JSON object per event.
pub fn init_tracing(default_directive: &str) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let json = std::env::var(LOG_FORMAT_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
    };

    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

//! Tracing subscriber setup for the server binary.

use tracing_subscriber::EnvFilter;

/// Error returned when the subscriber cannot be installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Chooses the filter directives: `RUST_LOG`, then `LOG_LEVEL`, then
/// [`DEFAULT_FILTER`].
#[must_use]
pub fn filter_directives(rust_log: Option<&str>, log_level: Option<&str>) -> String {
    [rust_log, log_level]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_owned()
}

/// Installs the global `fmt` subscriber.
///
/// Unparsable directives fall back to [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_tracing() -> Result<(), InitError> {
    let directives = filter_directives(
        std::env::var("RUST_LOG").ok().as_deref(),
        std::env::var("LOG_LEVEL").ok().as_deref(),
    );
    let filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}

//! Tracing subscriber initialization.
//!
//! Logs go to stderr so stdout stays free for the generated prompt.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Default filter directive for a `-v` count.
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the stderr subscriber.
///
/// Respects RUST_LOG; otherwise the level follows `verbosity`.
///
/// # Returns
/// * `Ok(())` if initialization succeeded
/// * `Err(LoggingError::SubscriberAlreadySet)` if a subscriber is already installed
pub fn init(verbosity: u8) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

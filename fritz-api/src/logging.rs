//! Logging setup for applications using the FRITZ!Box API
//!
//! The library itself only emits `tracing` events; this module installs a
//! subscriber for binaries that do not bring their own.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy)]
pub enum LoggingMode {
    /// No output
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose diagnostics with source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// # Environment Variables
///
/// - `FRITZ_LOG_LEVEL`: Override the filter (e.g. `debug`, `fritz_api=trace`)
/// - `RUST_LOG`: Used when `FRITZ_LOG_LEVEL` is unset
///
/// Without either, only the client crates log at the mode's level; their
/// dependencies are limited to warnings.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let subscriber = Registry::default()
                .with(fmt::layer().with_target(false).compact())
                .with(create_env_filter("info"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let subscriber = Registry::default()
                .with(fmt::layer().with_file(true).with_line_number(true))
                .with(create_env_filter("debug"));

            subscriber
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `FRITZ_LOG_MODE` (`development` or `debug`,
/// anything else is silent)
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("FRITZ_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };

    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("FRITZ_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_directives(default_level))
    }
}

/// Our crates at `level`, everything else (TLS, HTTP internals) at `warn`
fn default_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .fold("warn".to_string(), |directives, target| {
            format!("{},{}={}", directives, target, level)
        })
}

const LOG_TARGETS: [&str; 3] = ["fritz_api", "fritz_description", "soap_client"];

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

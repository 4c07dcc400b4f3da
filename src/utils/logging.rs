//! Logging initialization
//!
//! Provides simple logging setup that:
//! - Respects the RUST_LOG environment variable
//! - Falls back to a filter from the configuration file
//! - Defaults to "info" level
//!
//! # Usage
//!
//! ```rust,no_run
//! use dynload::utils::init_logging;
//!
//! init_logging(None); // Uses RUST_LOG or defaults to "info"
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize logging.
///
/// Precedence: RUST_LOG environment variable, then the provided filter,
/// then "info".
///
/// # Arguments
/// * `filter` - Optional log filter from config (e.g., "info", "debug",
///   "dynload=debug")
pub fn init_logging(filter: Option<&str>) {
    let mut env_filter = EnvFilter::from_default_env();

    // RUST_LOG always takes precedence over the config filter.
    if std::env::var("RUST_LOG").is_err() {
        env_filter = match filter {
            Some(f) => EnvFilter::new(f),
            None => EnvFilter::new("info"),
        };
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter)
        .init();
}

/// Initialize logging from a [`LoggingConfig`].
///
/// # Example
/// ```rust,no_run
/// use dynload::config::RegistryConfig;
/// use dynload::utils::init_logging_from_config;
///
/// let config = RegistryConfig::default();
/// init_logging_from_config(config.logging.as_ref());
/// ```
pub fn init_logging_from_config(config: Option<&LoggingConfig>) {
    init_logging(config.and_then(|c| c.filter.as_deref()));
}

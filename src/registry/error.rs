//! Registry error types

use thiserror::Error;

/// Errors surfaced by the registry.
///
/// Misuse (empty names, load requests for unregistered names) is not an
/// error; those inputs are silently absorbed. The only failure channels
/// are a loader's own async operation failing and configuration parsing.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A loader's async operation failed. The failure leaves no result
    /// cache entry; a later request for the same name re-attempts.
    #[error("loader for '{name}' failed: {source}")]
    LoaderFailed {
        /// The requested name whose loader failed
        name: String,
        /// The loader's underlying error
        #[source]
        source: anyhow::Error,
    },

    /// Configuration file unreadable or unparseable
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

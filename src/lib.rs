//! dynload - Deferred loader registry with memoization and single-flight
//! deduplication
//!
//! Binds logical names to deferred async loaders and guarantees that each
//! distinct loader runs at most once, no matter how many names map to it
//! or how many concurrent requests race for them. Resolved values are
//! memoized as `Arc<T>` and shared across all names bound to one loader.
//!
//! ## Design Principles
//!
//! 1. **First registration wins**: re-registering a name is a silent no-op
//! 2. **Dedup by identity**: names sharing one loader share its result
//! 3. **Single-flight**: concurrent requests converge on one invocation
//! 4. **Silent misuse absorption**: empty or unknown names never error
//!
//! ## Example
//!
//! ```rust
//! use dynload::{loader, LoaderRegistry};
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let registry = LoaderRegistry::new();
//!     registry
//!         .register(
//!             vec!["settings", "prefs"],
//!             loader(|| async { Ok("shared".to_string()) }),
//!         )
//!         .await;
//!
//!     // Loading one name resolves every name bound to the same loader.
//!     let values = registry.load("settings").await.unwrap();
//!     assert_eq!(*values[0], "shared");
//!     assert!(registry.get("prefs").await.is_some());
//! });
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod registry;
pub mod utils;

// Re-export the primary API at the crate root
pub use config::{LoggingConfig, RegistryConfig};
pub use registry::{
    loader, Loader, LoaderEntry, LoaderFuture, LoaderId, LoaderRegistry, Names, RegistryError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_crate_root_api_smoke() {
        let registry: LoaderRegistry<u32> = LoaderRegistry::new();
        registry.register("answer", loader(|| async { Ok(42) })).await;
        let values = registry.load(vec!["answer", "missing"]).await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(*values[0], 42);
    }
}

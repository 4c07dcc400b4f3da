//! Deferred loader registry
//!
//! Binds logical names to deferred async loaders and guarantees that each
//! distinct loader runs at most once:
//!
//! - **Memoization**: a name's resolved value is cached; repeated loads
//!   return the cached `Arc` without re-invoking the loader.
//! - **Identity dedup**: names registered against the same loader share
//!   its result; resolving one resolves the others.
//! - **Single-flight**: concurrent requests for names sharing a loader,
//!   including siblings in one batch, converge on one invocation.
//!
//! Misuse is absorbed silently: empty names are ignored at registration,
//! and unregistered names are dropped from load requests.

pub mod engine;
pub mod error;
pub mod loader;
pub mod names;

pub use engine::LoaderRegistry;
pub use error::RegistryError;
pub use loader::{loader, Loader, LoaderEntry, LoaderFuture, LoaderId};
pub use names::Names;

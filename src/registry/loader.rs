//! Loader types and identity
//!
//! A loader is a zero-argument async operation producing an arbitrary
//! value. The registry never inspects the value; it only memoizes it.
//! Each distinct loader allocation is assigned an opaque `LoaderId` at
//! registration time, and deduplication is keyed by that id rather than
//! by comparing pointers on the load path.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::names::Names;

/// Boxed future returned by a loader invocation.
pub type LoaderFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// A shared deferred loader: a zero-argument async operation.
///
/// Stored behind `Arc` so the same allocation can be bound to multiple
/// names. Binding one allocation to several names is what enables
/// dedup-by-identity across those names.
pub type Loader<T> = Arc<dyn Fn() -> LoaderFuture<T> + Send + Sync>;

/// Wrap an async closure into a [`Loader`].
///
/// ```rust
/// use dynload::registry::loader;
///
/// let l = loader(|| async { Ok::<_, anyhow::Error>(42u32) });
/// let _shared = l.clone();
/// ```
pub fn loader<T, F, Fut>(f: F) -> Loader<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()) as LoaderFuture<T>)
}

/// Opaque identifier for a distinct loader allocation.
///
/// Allocated monotonically at registration time. Two registrations that
/// share one `Arc` allocation share one `LoaderId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderId(pub(crate) u64);

/// Pointer-identity key for an `Arc<dyn Fn..>` allocation.
///
/// Only the data address matters; vtable metadata is discarded so the
/// key is stable for clones of the same allocation.
pub(crate) fn loader_key<T>(loader: &Loader<T>) -> usize {
    Arc::as_ptr(loader) as *const () as usize
}

/// A prepared registration: one or more names bound to a loader.
///
/// Used with [`LoaderRegistry::with_entries`](super::LoaderRegistry::with_entries)
/// to construct a registry from a fixed set of bindings.
pub struct LoaderEntry<T> {
    /// Names to bind
    pub names: Names,
    /// Shared loader for all of the names
    pub loader: Loader<T>,
}

impl<T> LoaderEntry<T> {
    /// Create an entry binding `names` to `loader`.
    pub fn new(names: impl Into<Names>, loader: Loader<T>) -> Self {
        Self {
            names: names.into(),
            loader,
        }
    }
}

//! Core registry engine
//!
//! Owns the four mappings behind a single `RwLock`:
//!
//! - load list: name -> registered loader
//! - result cache: name -> resolved value
//! - dedup index: loader id -> resolved value
//! - in-flight cells: loader id -> single-flight cell
//!
//! All critical sections are closure-scoped through the lock helpers and
//! never hold the lock across an `await`. Loader invocations run through
//! a shared `OnceCell` per loader id, so concurrent requests for names
//! sharing one loader perform exactly one invocation.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::utils::{with_read_lock, with_write_lock};

use super::error::RegistryError;
use super::loader::{loader_key, Loader, LoaderEntry, LoaderId};
use super::names::Names;

/// Shared single-flight cell for one loader id.
type FlightCell<T> = Arc<OnceCell<Arc<T>>>;

/// A name's binding in the load list.
struct Registered<T> {
    id: LoaderId,
    loader: Loader<T>,
}

impl<T> Clone for Registered<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            loader: Arc::clone(&self.loader),
        }
    }
}

/// Lock-protected registry state.
struct Inner<T> {
    load_list: HashMap<String, Registered<T>>,
    results: HashMap<String, Arc<T>>,
    resolved: HashMap<LoaderId, Arc<T>>,
    flights: HashMap<LoaderId, FlightCell<T>>,
    loader_ids: HashMap<usize, LoaderId>,
    next_loader_id: u64,
}

impl<T> Inner<T> {
    fn new() -> Self {
        Self {
            load_list: HashMap::new(),
            results: HashMap::new(),
            resolved: HashMap::new(),
            flights: HashMap::new(),
            loader_ids: HashMap::new(),
            next_loader_id: 0,
        }
    }

    /// Id for this loader allocation, reusing the existing id when the
    /// same `Arc` was registered before.
    fn loader_id(&mut self, loader: &Loader<T>) -> LoaderId {
        let key = loader_key(loader);
        if let Some(&id) = self.loader_ids.get(&key) {
            return id;
        }
        let id = LoaderId(self.next_loader_id);
        self.next_loader_id += 1;
        self.loader_ids.insert(key, id);
        id
    }

    /// Bind the still-unbound names to `loader`. Returns how many bound.
    ///
    /// The id is allocated only when at least one name binds, so every
    /// allocated id has a load list entry keeping its `Arc` alive (the
    /// pointer-identity key can never alias a freed allocation).
    fn register(&mut self, names: Vec<String>, loader: &Loader<T>) -> usize {
        let unbound: Vec<String> = names
            .into_iter()
            .filter(|n| !self.load_list.contains_key(n))
            .collect();
        if unbound.is_empty() {
            return 0;
        }
        let id = self.loader_id(loader);
        let bound = unbound.len();
        for name in unbound {
            self.load_list.insert(
                name,
                Registered {
                    id,
                    loader: Arc::clone(loader),
                },
            );
        }
        bound
    }

    /// Record a completed loader: dedup index entry, result cache entries
    /// for every unresolved name bound to it, and flight cell removal.
    fn complete(&mut self, id: LoaderId, value: &Arc<T>) {
        self.resolved.insert(id, Arc::clone(value));
        let pending: Vec<String> = self
            .load_list
            .iter()
            .filter(|(name, reg)| reg.id == id && !self.results.contains_key(*name))
            .map(|(name, _)| name.clone())
            .collect();
        for name in pending {
            self.results.insert(name, Arc::clone(value));
        }
        self.flights.remove(&id);
    }
}

/// Deferred loader registry with memoization and single-flight dedup.
///
/// Names are bound to shared async loaders; each distinct loader runs at
/// most once, no matter how many names map to it or how many concurrent
/// requests ask for them. Results are memoized as `Arc<T>`.
///
/// ```rust
/// use dynload::registry::{loader, LoaderRegistry};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let registry = LoaderRegistry::new();
///     registry
///         .register("config", loader(|| async { Ok("loaded".to_string()) }))
///         .await;
///     let values = registry.load("config").await.unwrap();
///     assert_eq!(*values[0], "loaded");
/// });
/// ```
pub struct LoaderRegistry<T> {
    inner: Arc<RwLock<Inner<T>>>,
    max_concurrent_loads: Option<usize>,
}

impl<T> Clone for LoaderRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_concurrent_loads: self.max_concurrent_loads,
        }
    }
}

impl<T: Send + Sync + 'static> Default for LoaderRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> LoaderRegistry<T> {
    /// Create an empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry honoring `config`.
    ///
    /// A `max_concurrent_loads` of zero is treated as unbounded.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::new())),
            max_concurrent_loads: config.max_concurrent_loads.filter(|&n| n > 0),
        }
    }

    /// Create a registry pre-populated from `entries`, in order.
    ///
    /// Equivalent to `new()` followed by `register` for each entry, so
    /// first registration wins for names appearing in multiple entries.
    pub fn with_entries(entries: Vec<LoaderEntry<T>>) -> Self {
        let mut inner = Inner::new();
        for entry in entries {
            inner.register(entry.names.into_vec(), &entry.loader);
        }
        Self {
            inner: Arc::new(RwLock::new(inner)),
            max_concurrent_loads: None,
        }
    }

    /// Register one or more names against a shared loader.
    ///
    /// Names already bound keep their first loader; empty names and empty
    /// sequences are silently ignored. All names bound by one call share
    /// the loader's identity, so loading any of them resolves the others.
    pub async fn register(&self, names: impl Into<Names>, loader: Loader<T>) {
        let names = names.into().into_vec();
        if names.is_empty() {
            debug!("Registration with no usable names ignored");
            return;
        }
        let requested = names.len();
        let bound =
            with_write_lock(&self.inner, |inner| inner.register(names, &loader)).await;
        debug!(
            "Registered {} name(s), {} already bound",
            bound,
            requested - bound
        );
    }

    /// Load one or more names, returning resolved values in request order.
    ///
    /// Unregistered names are silently dropped, so the result may be
    /// shorter than the request. Distinct loaders run concurrently;
    /// cached and in-flight results are reused without re-invocation.
    /// The first loader failure fails the whole batch.
    pub async fn load(&self, names: impl Into<Names>) -> Result<Vec<Arc<T>>, RegistryError> {
        let requested = names.into().into_vec();
        let selected: Vec<(String, Registered<T>)> = with_read_lock(&self.inner, |inner| {
            requested
                .iter()
                .filter_map(|name| {
                    inner
                        .load_list
                        .get(name)
                        .map(|reg| (name.clone(), reg.clone()))
                })
                .collect()
        })
        .await;

        if selected.is_empty() {
            debug!("No registered names in load request, nothing to do");
            return Ok(Vec::new());
        }

        info!(
            "Loading {} of {} requested name(s)",
            selected.len(),
            requested.len()
        );

        let loads = selected
            .into_iter()
            .map(|(name, reg)| self.load_entry(name, reg));

        match self.max_concurrent_loads {
            None => try_join_all(loads).await,
            Some(limit) => {
                stream::iter(loads)
                    .buffered(limit)
                    .try_collect::<Vec<_>>()
                    .await
            }
        }
    }

    /// Load every registered name, snapshotted at call time.
    ///
    /// Names are loaded in lexicographic order for a deterministic result
    /// sequence.
    pub async fn load_all(&self) -> Result<Vec<Arc<T>>, RegistryError> {
        let mut names = with_read_lock(&self.inner, |inner| {
            inner.load_list.keys().cloned().collect::<Vec<_>>()
        })
        .await;
        names.sort();
        self.load(names).await
    }

    /// Resolved value for `name`, if its loader has completed.
    ///
    /// Returns `None` for unregistered names and names still in flight.
    pub async fn get(&self, name: &str) -> Option<Arc<T>> {
        with_read_lock(&self.inner, |inner| inner.results.get(name).map(Arc::clone)).await
    }

    /// Snapshot of the current name -> loader mapping.
    ///
    /// Loader identity can be compared across names with `Arc::ptr_eq`.
    pub async fn load_list(&self) -> HashMap<String, Loader<T>> {
        with_read_lock(&self.inner, |inner| {
            inner
                .load_list
                .iter()
                .map(|(name, reg)| (name.clone(), Arc::clone(&reg.loader)))
                .collect()
        })
        .await
    }

    /// Resolve a single registered name.
    ///
    /// Check order: sibling result via the dedup index, then this name's
    /// own cache entry, then single-flight invocation. The flight cell is
    /// fetched or installed in the same critical section that performs
    /// the checks, so unsettled siblings always converge on one cell.
    async fn load_entry(&self, name: String, reg: Registered<T>) -> Result<Arc<T>, RegistryError> {
        enum Step<T> {
            Done(Arc<T>),
            Fly(FlightCell<T>),
        }

        let step = with_write_lock(&self.inner, |inner| {
            if let Some(value) = inner.resolved.get(&reg.id) {
                let value = Arc::clone(value);
                inner
                    .results
                    .entry(name.clone())
                    .or_insert_with(|| Arc::clone(&value));
                return Step::Done(value);
            }
            if let Some(value) = inner.results.get(&name) {
                return Step::Done(Arc::clone(value));
            }
            let cell = inner
                .flights
                .entry(reg.id)
                .or_insert_with(|| Arc::new(OnceCell::new()));
            Step::Fly(Arc::clone(cell))
        })
        .await;

        let cell = match step {
            Step::Done(value) => {
                debug!("'{}' served from cache", name);
                return Ok(value);
            }
            Step::Fly(cell) => cell,
        };

        // A failed attempt leaves the cell empty; the next waiter in line
        // re-attempts with its own invocation.
        let value = cell
            .get_or_try_init(|| {
                debug!("Invoking loader for '{}'", name);
                let fut = (reg.loader)();
                let name = name.clone();
                async move {
                    fut.await
                        .map(Arc::new)
                        .map_err(|source| RegistryError::LoaderFailed { name, source })
                }
            })
            .await
            .map(Arc::clone)?;

        with_write_lock(&self.inner, |inner| inner.complete(reg.id, &value)).await;
        Ok(value)
    }
}

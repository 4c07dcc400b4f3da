//! Lock utilities for async contexts
//!
//! Provides helpers for common lock patterns with automatic release.
//! Guards are scoped to a closure, so the lock is never held across an
//! `await` point.

use tokio::sync::RwLock;

/// Execute a closure with a read lock, automatically releasing it
///
/// # Example
/// ```rust
/// use dynload::utils::with_read_lock;
/// use tokio::sync::RwLock;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let shared = RwLock::new(vec![1, 2, 3]);
///     let len = with_read_lock(&shared, |guard| guard.len()).await;
///     assert_eq!(len, 3);
/// });
/// ```
pub async fn with_read_lock<T, F, R>(rwlock: &RwLock<T>, f: F) -> R
where
    F: FnOnce(&T) -> R,
{
    let guard = rwlock.read().await;
    f(&guard)
}

/// Execute a closure with a write lock, automatically releasing it
///
/// # Example
/// ```rust
/// use dynload::utils::with_write_lock;
/// use tokio::sync::RwLock;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let shared = RwLock::new(Vec::new());
///     with_write_lock(&shared, |guard| guard.push(1)).await;
///     assert_eq!(*shared.read().await, vec![1]);
/// });
/// ```
pub async fn with_write_lock<T, F, R>(rwlock: &RwLock<T>, f: F) -> R
where
    F: FnOnce(&mut T) -> R,
{
    let mut guard = rwlock.write().await;
    f(&mut guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_lock_releases_after_closure() {
        let lock = RwLock::new(5u32);
        let doubled = with_read_lock(&lock, |v| v * 2).await;
        assert_eq!(doubled, 10);
        // Lock must be free again for a writer.
        *lock.write().await = 7;
    }

    #[tokio::test]
    async fn test_write_lock_mutates() {
        let lock = RwLock::new(Vec::<String>::new());
        with_write_lock(&lock, |v| v.push("a".to_string())).await;
        let len = with_read_lock(&lock, |v| v.len()).await;
        assert_eq!(len, 1);
    }
}

//! Shared handle to a store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::store::GridStore;

/// Cloneable, thread-safe handle to one [`GridStore`].
///
/// Hosts and the persistence layer share the store through this handle. A
/// poisoned lock is recovered: the store holds no invariant that a panicking
/// observer could leave half-applied.
#[derive(Debug, Clone, Default)]
pub struct GridHandle {
    inner: Arc<Mutex<GridStore>>,
}

impl GridHandle {
    pub fn new(store: GridStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Lock the store.
    pub fn lock(&self) -> MutexGuard<'_, GridStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&GridStore) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access.
    pub fn update<R>(&self, f: impl FnOnce(&mut GridStore) -> R) -> R {
        f(&mut self.lock())
    }

    /// Whether two handles point at the same store.
    pub fn same_store(&self, other: &GridHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<GridStore> for GridHandle {
    fn from(store: GridStore) -> Self {
        Self::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_store() {
        let handle = GridHandle::default();
        let other = handle.clone();
        other.update(|store| store.set_search("abc"));
        assert_eq!(handle.read(|store| store.state().search_query.clone()), "abc");
        assert!(handle.same_store(&other));
        assert!(!handle.same_store(&GridHandle::default()));
    }

    #[test]
    fn test_handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GridHandle>();
    }
}

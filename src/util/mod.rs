//! Small shared utilities.

use std::sync::{Arc, OnceLock};

use crate::error::Result;

/// Loader closure for a lazily constructed backend handle.
pub type HandleLoader<T> = Box<dyn Fn() -> Result<Arc<T>> + Send + Sync>;

/// A process-scoped, initialize-once handle to an expensive backend.
///
/// The handle is either injected pre-constructed, or built on first use by
/// a loader. Concurrent first uses may each run the loader; exactly one
/// result is published and the losers' work is dropped. Loading twice must
/// therefore be safe (it only wastes work), which holds for every backend
/// shipped here. Once published, the handle lives for the rest of the
/// process.
pub struct LazyHandle<T: ?Sized> {
    cell: OnceLock<Arc<T>>,
    loader: Option<HandleLoader<T>>,
}

impl<T: ?Sized> LazyHandle<T> {
    /// Defer construction to `loader`, run at most usefully-once.
    pub fn new(loader: HandleLoader<T>) -> Self {
        Self {
            cell: OnceLock::new(),
            loader: Some(loader),
        }
    }

    /// Use an already-constructed handle; no lazy loading involved.
    pub fn preloaded(handle: Arc<T>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(handle);
        Self { cell, loader: None }
    }

    /// Get the handle, loading it first if necessary.
    pub fn get_or_load(&self) -> Result<Arc<T>> {
        if let Some(handle) = self.cell.get() {
            return Ok(handle.clone());
        }
        let loader = self.loader.as_ref().ok_or_else(|| {
            crate::error::KigoError::Configuration(
                "No backend handle and no loader configured".to_string(),
            )
        })?;
        let loaded = loader()?;
        // Another request may have won the race; keep whichever published.
        Ok(self.cell.get_or_init(|| loaded).clone())
    }

    /// Whether the handle has been constructed yet.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: ?Sized> std::fmt::Debug for LazyHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn loads_once_across_sequential_uses() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let handle: LazyHandle<u32> = LazyHandle::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(7))
        }));

        assert!(!handle.is_loaded());
        assert_eq!(*handle.get_or_load().unwrap(), 7);
        assert_eq!(*handle.get_or_load().unwrap(), 7);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn preloaded_never_runs_a_loader() {
        let handle = LazyHandle::preloaded(Arc::new("ready"));
        assert!(handle.is_loaded());
        assert_eq!(*handle.get_or_load().unwrap(), "ready");
    }

    #[test]
    fn loader_errors_are_not_cached() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let handle: LazyHandle<u32> = LazyHandle::new(Box::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(crate::error::KigoError::Backend("cold start".into()))
            } else {
                Ok(Arc::new(1))
            }
        }));

        assert!(handle.get_or_load().is_err());
        assert_eq!(*handle.get_or_load().unwrap(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}

//! Lazily built derived indexes.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A derived view that is built on first read and replaced wholesale.
///
/// The first reader builds the value under the write lock after re-checking
/// the slot, so concurrent first reads produce exactly one build. The value
/// is never patched: [`rebuild`](Self::rebuild) computes a fresh one and
/// [`invalidate`](Self::invalidate) defers that to the next read.
///
/// The build closure runs while the slot is locked and must not read the
/// same `LazyIndex`.
pub(crate) struct LazyIndex<T> {
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> LazyIndex<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub(crate) fn get_or_build(&self, build: impl FnOnce() -> T) -> Arc<T> {
        if let Some(value) = self.slot.read().as_ref() {
            return Arc::clone(value);
        }
        let mut slot = self.slot.write();
        if let Some(value) = slot.as_ref() {
            return Arc::clone(value);
        }
        let value = Arc::new(build());
        *slot = Some(Arc::clone(&value));
        value
    }

    pub(crate) fn rebuild(&self, build: impl FnOnce() -> T) -> Arc<T> {
        let value = Arc::new(build());
        *self.slot.write() = Some(Arc::clone(&value));
        value
    }

    pub(crate) fn invalidate(&self) {
        *self.slot.write() = None;
    }

    pub(crate) fn is_built(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl<T> Default for LazyIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for LazyIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyIndex")
            .field("built", &self.is_built())
            .finish()
    }
}

//! In-memory storage backend for testing.

use crate::backend::StateBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;

/// An in-memory storage backend.
///
/// This backend stores the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral backends that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Failure Injection
///
/// `fail_writes` makes every subsequent `store` return
/// [`StorageError::Unavailable`] without touching the stored blob. Callers
/// use this to exercise their rollback paths.
///
/// # Example
///
/// ```rust
/// use tfstated_storage::{StateBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// assert_eq!(backend.load().unwrap(), None);
/// backend.store(b"test data").unwrap();
/// assert_eq!(backend.load().unwrap(), Some(b"test data".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
    fail_writes: RwLock<bool>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing blob.
    ///
    /// Useful for testing startup with prior state.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
            fail_writes: RwLock::new(false),
        }
    }

    /// Returns a copy of the stored blob, if any.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Makes subsequent `store` calls fail with `Unavailable`.
    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.write() = fail;
    }

    /// Clears the backend back to the never-stored condition.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }
}

impl StateBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.read().clone())
    }

    fn store(&mut self, data: &[u8]) -> StorageResult<()> {
        if *self.fail_writes.read() {
            return Err(StorageError::unavailable("write failure injected"));
        }
        *self.data.write() = Some(data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.load().unwrap(), None);
        assert!(backend.data().is_none());
    }

    #[test]
    fn memory_store_and_load() {
        let mut backend = InMemoryBackend::new();
        backend.store(b"hello").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn memory_store_replaces() {
        let mut backend = InMemoryBackend::new();
        backend.store(b"first").unwrap();
        backend.store(b"second").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.load().unwrap(), Some(b"preloaded".to_vec()));
    }

    #[test]
    fn memory_empty_blob_distinct_from_none() {
        let mut backend = InMemoryBackend::new();
        backend.store(b"").unwrap();
        assert_eq!(backend.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn memory_clear() {
        let mut backend = InMemoryBackend::new();
        backend.store(b"some data").unwrap();
        backend.clear();
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn memory_fail_writes_keeps_old_blob() {
        let mut backend = InMemoryBackend::new();
        backend.store(b"good").unwrap();

        backend.fail_writes(true);
        let result = backend.store(b"bad");
        assert!(matches!(result, Err(StorageError::Unavailable { .. })));
        assert_eq!(backend.load().unwrap(), Some(b"good".to_vec()));

        backend.fail_writes(false);
        backend.store(b"recovered").unwrap();
        assert_eq!(backend.load().unwrap(), Some(b"recovered".to_vec()));
    }
}

//! The engine: the operation surface transport layers call into.

use crate::document::{Checksum, StateDocument};
use crate::error::EngineResult;
use crate::lock::{LockInfo, LockManager};
use crate::store::StateStore;
use parking_lot::Mutex;
use tfstated_storage::StateBackend;

struct Inner {
    store: StateStore,
    locks: LockManager,
}

/// The state storage and locking engine.
///
/// Composes the [`StateStore`] and the [`LockManager`] behind a single
/// mutex so that every operation - including write authorization followed
/// by the content swap - runs as one atomic check-then-act. No interleaved
/// acquire can take effect between a write's authorization and its commit.
///
/// Concurrent acquires are linearized by arrival order at the mutex:
/// exactly one of any set of simultaneous acquires observes `Unlocked` and
/// wins; all others receive the winner's [`LockInfo`] in their conflict.
///
/// The engine is `Send + Sync`; share it across request tasks via `Arc`.
/// Every critical section is constant-time, so no operation blocks beyond
/// the gate itself - retry and timeout policy belong to callers.
///
/// # Example
///
/// ```rust
/// use tfstated_core::{LockInfo, StateEngine};
///
/// let engine = StateEngine::in_memory();
/// engine.lock_acquire(LockInfo::new("lock-1", "alice@host", "apply")).unwrap();
/// let checksum = engine.write_state(b"{}".to_vec(), Some("lock-1")).unwrap();
/// assert_eq!(engine.read_state().unwrap().checksum, checksum);
/// engine.lock_release("lock-1").unwrap();
/// ```
pub struct StateEngine {
    inner: Mutex<Inner>,
}

impl StateEngine {
    /// Opens an engine over a storage backend, loading any persisted state.
    ///
    /// The lock state always starts `Unlocked`: a lock is only meaningful
    /// while the process holding it is alive.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: Box<dyn StateBackend>) -> EngineResult<Self> {
        let store = StateStore::open(backend)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                store,
                locks: LockManager::new(),
            }),
        })
    }

    /// Creates an engine over an in-memory backend with no prior state.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(Inner {
                store: StateStore::in_memory(),
                locks: LockManager::new(),
            }),
        }
    }

    /// Returns the current state document and its checksum.
    ///
    /// A backend with no prior state yields the empty document.
    ///
    /// # Errors
    ///
    /// Infallible for the built-in backends; the `Result` is part of the
    /// operation surface so read-through backends can report storage
    /// failures.
    pub fn read_state(&self) -> EngineResult<StateDocument> {
        Ok(self.inner.lock().store.get().clone())
    }

    /// Replaces the state content, gated by the lock.
    ///
    /// Authorization and the content swap happen inside one critical
    /// section. While unlocked any write succeeds (advisory locking); while
    /// locked the caller must present the holder's token.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Conflict`] with the holder if the token is
    ///   missing or wrong while locked
    /// - [`crate::EngineError::Storage`] if the durable medium fails; the
    ///   previous content remains served
    pub fn write_state(&self, content: Vec<u8>, lock_id: Option<&str>) -> EngineResult<Checksum> {
        let mut inner = self.inner.lock();
        inner.locks.authorize_write(lock_id)?;
        let checksum = inner.store.put(content)?;
        tracing::debug!(checksum = %checksum, "state written");
        Ok(checksum)
    }

    /// Acquires the lock for `info`.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Conflict`] with the current holder
    /// - [`crate::EngineError::Malformed`] if the lock id is empty
    pub fn lock_acquire(&self, info: LockInfo) -> EngineResult<()> {
        let id = info.id.clone();
        let result = self.inner.lock().locks.acquire(info);
        match &result {
            Ok(()) => tracing::info!(lock_id = %id, "lock acquired"),
            // Contention is routine, never an error-level event.
            Err(err) => tracing::debug!(lock_id = %id, %err, "lock acquire rejected"),
        }
        result
    }

    /// Releases the lock identified by `id`.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError::Conflict`] with the true holder if `id` does
    ///   not match
    /// - [`crate::EngineError::NotLocked`] if no lock is held
    /// - [`crate::EngineError::Malformed`] if `id` is empty
    pub fn lock_release(&self, id: &str) -> EngineResult<()> {
        let result = self.inner.lock().locks.release(id);
        match &result {
            Ok(()) => tracing::info!(lock_id = %id, "lock released"),
            Err(err) => tracing::debug!(lock_id = %id, %err, "lock release rejected"),
        }
        result
    }

    /// Returns the current lock holder, or `None` while unlocked.
    ///
    /// Any acquire or release that has returned is visible here.
    #[must_use]
    pub fn lock_status(&self) -> Option<LockInfo> {
        self.inner.lock().locks.current().cloned()
    }
}

//! Authoritative holder of the state document.

use crate::document::{Checksum, StateDocument};
use crate::error::EngineResult;
use tfstated_storage::{InMemoryBackend, StateBackend};

/// Durable holder of the current state document.
///
/// The store owns the authoritative [`StateDocument`] and a boxed
/// [`StateBackend`] that persists it. Reads are served from the in-memory
/// copy, which always equals the last successfully persisted content.
///
/// # Write Ordering
///
/// `put` persists to the backend *before* swapping the in-memory document
/// (persist-then-acknowledge). On a backend failure the in-memory copy is
/// untouched, so the store rolls back to the last persisted content and a
/// retry can succeed once storage recovers.
///
/// The store is not internally synchronized: [`crate::StateEngine`]
/// serializes access so that write authorization and the content swap form
/// one critical section.
pub struct StateStore {
    backend: Box<dyn StateBackend>,
    document: StateDocument,
}

impl StateStore {
    /// Opens a store over `backend`, loading any previously persisted state.
    ///
    /// A backend with no prior state yields the empty document - that is a
    /// valid fresh backend, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(backend: Box<dyn StateBackend>) -> EngineResult<Self> {
        let document = match backend.load()? {
            Some(content) => StateDocument::new(content),
            None => StateDocument::empty(),
        };
        Ok(Self { backend, document })
    }

    /// Creates a store over a fresh in-memory backend.
    pub(crate) fn in_memory() -> Self {
        Self {
            backend: Box::new(InMemoryBackend::new()),
            document: StateDocument::empty(),
        }
    }

    /// Returns the current document verbatim. Never fails: a backend with
    /// no prior state serves the empty document.
    #[must_use]
    pub fn get(&self) -> &StateDocument {
        &self.document
    }

    /// Replaces the document with `content`, returning the new checksum.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the durable medium cannot be written; the
    /// in-memory document then still holds the last persisted content.
    pub fn put(&mut self, content: Vec<u8>) -> EngineResult<Checksum> {
        self.backend.store(&content)?;
        self.document = StateDocument::new(content);
        Ok(self.document.checksum)
    }
}

//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level storage backend for the state document.
///
/// Storage backends are **opaque blob stores**. They hold the current state
/// document as a single byte sequence and replace it as a whole. The core
/// owns all interpretation - backends do not understand state formats,
/// checksums, or lock records.
///
/// # Invariants
///
/// - `load` returns exactly the bytes most recently passed to a successful
///   `store`, or `None` if nothing was ever stored
/// - `store` is atomic: no reader observes a partial write
/// - `store` is durable before it returns (persist-then-acknowledge); a
///   crash after `store` returns must not lose the new blob
/// - A failed `store` leaves the previously stored blob intact
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StateBackend: Send + Sync {
    /// Loads the currently stored blob.
    ///
    /// Returns `None` if nothing was ever stored. A backend with no prior
    /// state is valid and must be distinguishable from an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored blob with `data`.
    ///
    /// After this returns successfully, the new blob is guaranteed to
    /// survive process termination. On failure the previously stored blob
    /// remains intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable medium cannot be written.
    fn store(&mut self, data: &[u8]) -> StorageResult<()>;
}

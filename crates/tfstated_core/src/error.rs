//! Error types for the state engine.

use crate::lock::LockInfo;
use tfstated_storage::StorageError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in engine operations.
///
/// None of these is fatal to the process: every failure is scoped to the
/// single operation that produced it.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The lock or write could not proceed because another holder is active.
    ///
    /// Routine contention, not a fault. Carries the full current holder so
    /// the caller can decide whether to wait, retry, or alert a human.
    #[error("state locked by {holder}")]
    Conflict {
        /// The current lock holder.
        holder: LockInfo,
    },

    /// A release was attempted while no lock is held.
    ///
    /// Distinct from [`EngineError::Conflict`]: callers must be able to tell
    /// "nothing to unlock" from "someone else owns it".
    #[error("no lock is currently held")]
    NotLocked,

    /// The durable medium failed; the in-memory state is unchanged and a
    /// retry may succeed once storage recovers.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The caller supplied an invalid or missing token or body. Rejected
    /// before touching any state.
    #[error("malformed request: {message}")]
    Malformed {
        /// Description of what was invalid.
        message: String,
    },
}

impl EngineError {
    /// Creates a malformed-request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Returns true if this is a lock conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns the conflicting holder, if this is a conflict.
    pub fn holder(&self) -> Option<&LockInfo> {
        match self {
            Self::Conflict { holder } => Some(holder),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_carries_holder() {
        let holder = LockInfo::new("lock-1", "alice@host", "plan");
        let err = EngineError::Conflict {
            holder: holder.clone(),
        };
        assert!(err.is_conflict());
        assert_eq!(err.holder(), Some(&holder));
        assert!(err.to_string().contains("lock-1"));
    }

    #[test]
    fn not_locked_has_no_holder() {
        let err = EngineError::NotLocked;
        assert!(!err.is_conflict());
        assert!(err.holder().is_none());
    }

    #[test]
    fn malformed_display() {
        let err = EngineError::malformed("lock id must not be empty");
        assert!(err.to_string().contains("lock id must not be empty"));
    }
}

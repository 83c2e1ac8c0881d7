//! Lock record, lock state machine, and the lock manager.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_created() -> DateTime<Utc> {
    Utc::now()
}

/// An active lock claim.
///
/// The `id` is the token the client must echo back to release the lock or
/// to write while it is held; the remaining fields are informational. Field
/// names serialize in the wire format infrastructure-as-code clients send
/// (`ID`, `Who`, `Operation`, `Created`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Opaque token chosen by the acquiring client, unique per acquisition.
    #[serde(rename = "ID")]
    pub id: String,

    /// Identity of the holder, e.g. `user@hostname`.
    #[serde(rename = "Who", default)]
    pub who: String,

    /// Human-readable description of what the holder intends to do.
    #[serde(rename = "Operation", default)]
    pub operation: String,

    /// When the lock was acquired.
    #[serde(rename = "Created", default = "default_created")]
    pub created: DateTime<Utc>,
}

impl LockInfo {
    /// Creates a lock claim timestamped now.
    pub fn new(
        id: impl Into<String>,
        who: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            who: who.into(),
            operation: operation.into(),
            created: Utc::now(),
        }
    }
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.id, self.who, self.operation)
    }
}

/// The lock state machine.
///
/// `Unlocked` is a first-class state, not an absence special case: while
/// unlocked, writes are permitted without a token (advisory locking). There
/// is no terminal state; the manager cycles between the two states for the
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LockState {
    /// No lock is held; writes are unrestricted.
    #[default]
    Unlocked,
    /// A single holder owns the lock; writes require its token.
    Locked(LockInfo),
}

/// Enforces single-writer mutual exclusion and answers lock-status queries.
///
/// The manager exclusively owns the [`LockState`] and implements the full
/// check-and-transition for each operation. It is not internally
/// synchronized: [`crate::StateEngine`] serializes all calls under a single
/// mutex, which is what makes concurrent acquires linearizable (arrival
/// order at the gate decides the winner).
///
/// # State Machine
///
/// ```text
/// Unlocked --acquire(info)-------------> Locked(info)
/// Locked(info) --release(info.id)------> Unlocked
/// Locked(info) --release(other)--------> Locked(info)   [Conflict]
/// Locked(info) --acquire(other)--------> Locked(info)   [Conflict]
/// Locked(info) --acquire(same id)------> Locked(info)   [ok, retry]
/// Unlocked --release(*)----------------> Unlocked       [NotLocked]
/// ```
#[derive(Debug, Default)]
pub struct LockManager {
    state: LockState,
}

impl LockManager {
    /// Creates a manager in the `Unlocked` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to acquire the lock for `info`.
    ///
    /// Re-acquiring with the identical `id` while holding the lock is
    /// idempotent success: it is indistinguishable from a network retry of
    /// a prior successful acquire.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Conflict`] with the current holder if another
    ///   client holds the lock
    /// - [`EngineError::Malformed`] if `info.id` is empty (an
    ///   unidentifiable lock could never be released)
    pub fn acquire(&mut self, info: LockInfo) -> EngineResult<()> {
        if info.id.is_empty() {
            return Err(EngineError::malformed("lock id must not be empty"));
        }
        match &self.state {
            LockState::Unlocked => {
                self.state = LockState::Locked(info);
                Ok(())
            }
            LockState::Locked(held) if held.id == info.id => Ok(()),
            LockState::Locked(held) => Err(EngineError::Conflict {
                holder: held.clone(),
            }),
        }
    }

    /// Releases the lock if `id` matches the held token.
    ///
    /// Never silently unlocks another holder's lock.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Conflict`] with the true holder if `id` does not
    ///   match
    /// - [`EngineError::NotLocked`] if no lock is held
    /// - [`EngineError::Malformed`] if `id` is empty
    pub fn release(&mut self, id: &str) -> EngineResult<()> {
        if id.is_empty() {
            return Err(EngineError::malformed("lock id must not be empty"));
        }
        match &self.state {
            LockState::Unlocked => Err(EngineError::NotLocked),
            LockState::Locked(held) if held.id == id => {
                self.state = LockState::Unlocked;
                Ok(())
            }
            LockState::Locked(held) => Err(EngineError::Conflict {
                holder: held.clone(),
            }),
        }
    }

    /// Decides whether a write presenting `token` may proceed.
    ///
    /// While unlocked, always ok: locking is advisory and writes are
    /// unrestricted until somebody claims the lock. While locked, ok only
    /// when the presented token equals the held `id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Conflict`] with the current holder otherwise.
    pub fn authorize_write(&self, token: Option<&str>) -> EngineResult<()> {
        match &self.state {
            LockState::Unlocked => Ok(()),
            LockState::Locked(held) => match token {
                Some(id) if id == held.id => Ok(()),
                _ => Err(EngineError::Conflict {
                    holder: held.clone(),
                }),
            },
        }
    }

    /// Returns the current holder, or `None` while unlocked.
    ///
    /// Reflects the most recent committed transition.
    #[must_use]
    pub fn current(&self) -> Option<&LockInfo> {
        match &self.state {
            LockState::Unlocked => None,
            LockState::Locked(held) => Some(held),
        }
    }
}

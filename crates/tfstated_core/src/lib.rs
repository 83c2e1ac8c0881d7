//! # tfstated Core
//!
//! State storage and locking engine for tfstated.
//!
//! This crate owns the two pieces of state the backend exists to protect:
//! the current state document and the lock record. It provides:
//! - [`StateStore`] - authoritative holder of the state document bytes and
//!   their checksum, backed by a [`tfstated_storage::StateBackend`]
//! - [`LockManager`] - single-writer mutual exclusion with token-validated
//!   release and advisory write authorization
//! - [`StateEngine`] - the operation surface consumed by transport layers,
//!   serializing every check-then-act under one critical section
//!
//! # Locking Model
//!
//! Locking is advisory: while no lock is held, writes are unrestricted.
//! Once a client acquires the lock, every write and every release must
//! present the acquiring `lockID` token. A conflicting call always receives
//! the full current holder's [`LockInfo`] so the caller can decide whether
//! to wait, retry, or alert a human.
//!
//! # Concurrency
//!
//! [`StateEngine`] is `Send + Sync` and is shared across request tasks via
//! `Arc`. Each operation is a constant-time critical section; concurrent
//! acquires are linearized by arrival order at the engine's mutex, so
//! exactly one of any set of simultaneous acquires succeeds.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod document;
mod engine;
mod error;
mod lock;
mod store;

pub use document::{Checksum, StateDocument};
pub use engine::StateEngine;
pub use error::{EngineError, EngineResult};
pub use lock::{LockInfo, LockManager, LockState};
pub use store::StateStore;

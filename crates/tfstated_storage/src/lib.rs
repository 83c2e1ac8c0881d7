//! # tfstated Storage
//!
//! Storage backend trait and implementations for tfstated.
//!
//! This crate provides the lowest-level storage abstraction for the state
//! backend. Storage backends are **opaque blob stores** - they hold the
//! serialized state document as a single byte sequence and do not interpret
//! its contents.
//!
//! ## Design Principles
//!
//! - Backends store one blob, replaced as a whole (load, store)
//! - `store` is atomic: a concurrent reader observes the old blob or the new
//!   blob, never a partial write
//! - `store` is durable: data survives process termination once it returns
//! - Must be `Send + Sync` for concurrent access
//! - The core owns checksums and lock records; backends see only bytes
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral state
//! - [`FileBackend`] - For persistent state using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use tfstated_storage::{StateBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.store(b"hello world").unwrap();
//! assert_eq!(backend.load().unwrap(), Some(b"hello world".to_vec()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StateBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;

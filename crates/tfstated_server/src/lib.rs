//! # tfstated Server
//!
//! HTTP transport for the tfstated state backend.
//!
//! This crate is thin plumbing around [`tfstated_core::StateEngine`]: it
//! translates HTTP requests into engine calls and engine outcomes into
//! status codes. All locking and storage rules live in the core.
//!
//! # Endpoints
//!
//! | Method   | Path                         | Engine call    |
//! |----------|------------------------------|----------------|
//! | `GET`    | `/ping`                      | - (liveness)   |
//! | `GET`    | `/api/v1/state/default`      | `read_state`   |
//! | `POST`   | `/api/v1/state/default?ID=t` | `write_state`  |
//! | `LOCK`   | `/api/v1/state/default`      | `lock_acquire` |
//! | `UNLOCK` | `/api/v1/state/default`      | `lock_release` |
//! | `GET`    | `/api/v1/state/default/lock` | `lock_status`  |
//! | `PUT`    | `/api/v1/state/default/lock` | `lock_acquire` |
//! | `DELETE` | `/api/v1/state/default/lock` | `lock_release` |
//!
//! The custom `LOCK`/`UNLOCK` verbs are what infrastructure-as-code clients
//! send when lock support is enabled; the `PUT`/`DELETE` aliases on the
//! `/lock` sub-path serve clients that cannot emit custom verbs.
//!
//! # Status Mapping
//!
//! - Lock/write conflict: `423 Locked` with the holder's lock info as the
//!   JSON body, so the caller learns *who* holds the lock
//! - Unlock while unlocked: `200 OK` (treated as already-unlocked)
//! - Malformed body or empty token: `400 Bad Request`
//! - Storage failure: `500 Internal Server Error`; the previous state is
//!   still served and a retry may succeed

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handlers;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handlers::build_router;
pub use server::StateServer;

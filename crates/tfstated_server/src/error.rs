//! Error types for the server.

use tfstated_core::EngineError;
use tfstated_storage::StorageError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request format.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Engine rejected or failed the operation.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Storage backend failure during startup.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error (bind, accept).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        match self {
            ServerError::InvalidRequest(_) => true,
            ServerError::Engine(err) => !matches!(err, EngineError::Storage(_)),
            _ => false,
        }
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::InvalidRequest("bad".into()).is_client_error());
        assert!(ServerError::from(EngineError::NotLocked).is_client_error());
        assert!(
            ServerError::from(EngineError::Storage(StorageError::unavailable("disk")))
                .is_server_error()
        );
        assert!(ServerError::Io(std::io::Error::other("bind")).is_server_error());
    }

    #[test]
    fn error_display() {
        let err = ServerError::InvalidRequest("missing body".into());
        assert!(err.to_string().contains("missing body"));
    }
}

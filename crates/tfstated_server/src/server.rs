//! The state backend server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handlers::build_router;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tfstated_core::StateEngine;
use tfstated_storage::FileBackend;

/// The state backend server.
///
/// Owns the engine and the configuration, builds the router, and runs the
/// HTTP listener. All locking and storage decisions are delegated to
/// [`StateEngine`]; this type only wires transport to it.
///
/// # Example
///
/// ```no_run
/// use tfstated_server::{ServerConfig, StateServer};
///
/// # async fn run() -> Result<(), tfstated_server::ServerError> {
/// let config = ServerConfig::default().with_state_path("terraform.tfstate");
/// let server = StateServer::new(config)?;
/// server.serve(std::future::pending()).await
/// # }
/// ```
pub struct StateServer {
    config: ServerConfig,
    engine: Arc<StateEngine>,
}

impl StateServer {
    /// Creates a server, opening the configured storage backend and loading
    /// any persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be opened or read.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let engine = match &config.state_path {
            Some(path) => StateEngine::open(Box::new(FileBackend::open(path)?))?,
            None => StateEngine::in_memory(),
        };

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }

    /// Returns a handle to the engine, e.g. for embedding or inspection.
    #[must_use]
    pub fn engine(&self) -> Arc<StateEngine> {
        Arc::clone(&self.engine)
    }

    /// Builds the router serving this server's engine.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.engine), &self.config)
    }

    /// Binds the configured address and serves until `shutdown` resolves,
    /// then drains in-flight connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the listener
    /// fails.
    pub async fn serve<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "state backend listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("state backend stopped");
        Ok(())
    }
}

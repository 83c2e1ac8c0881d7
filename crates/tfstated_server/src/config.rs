//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default cap on the state payload accepted in a single write.
pub const DEFAULT_MAX_STATE_BYTES: usize = 8 * 1024 * 1024;

/// Configuration for the state backend server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Path of the state file; `None` keeps state in memory only.
    pub state_path: Option<PathBuf>,
    /// Maximum accepted state payload in bytes.
    pub max_state_bytes: usize,
}

impl ServerConfig {
    /// Creates a new configuration with in-memory state.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            state_path: None,
            max_state_bytes: DEFAULT_MAX_STATE_BYTES,
        }
    }

    /// Persists state to the given file path.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Sets the maximum accepted state payload.
    pub fn with_max_state_bytes(mut self, max: usize) -> Self {
        self.max_state_bytes = max;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.state_path.is_none());
        assert_eq!(config.max_state_bytes, DEFAULT_MAX_STATE_BYTES);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_state_path("/var/lib/tfstated/terraform.tfstate")
            .with_max_state_bytes(1024);

        assert_eq!(config.bind_addr.port(), 9000);
        assert!(config.state_path.is_some());
        assert_eq!(config.max_state_bytes, 1024);
    }
}

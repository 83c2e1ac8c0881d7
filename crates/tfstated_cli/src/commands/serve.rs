//! The `serve` command: run the HTTP state backend.

use std::net::SocketAddr;
use std::path::PathBuf;
use tfstated_server::{ServerConfig, StateServer};

/// Runs the backend until SIGINT or SIGTERM, then drains and exits.
pub fn run(
    bind: SocketAddr,
    state_file: PathBuf,
    in_memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ServerConfig::new(bind);
    if in_memory {
        tracing::warn!("state is kept in memory only and will be lost on exit");
    } else {
        config = config.with_state_path(state_file);
    }

    let server = StateServer::new(config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server.serve(shutdown_signal()))?;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

//! tfstated CLI
//!
//! Command-line interface for the tfstated state backend.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP state backend
//! - `checksum` - Print the checksum the backend would assign to a file
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// tfstated: a remote state backend with advisory locking.
#[derive(Parser)]
#[command(name = "tfstated")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP state backend
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// Path of the state file
        #[arg(long, default_value = "terraform.tfstate")]
        state_file: PathBuf,

        /// Keep state in memory only (discarded on exit)
        #[arg(long)]
        in_memory: bool,
    },

    /// Print the checksum the backend would assign to a state file
    Checksum {
        /// File to checksum
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            state_file,
            in_memory,
        } => {
            commands::serve::run(bind, state_file, in_memory)?;
        }
        Commands::Checksum { file } => {
            commands::checksum::run(&file)?;
        }
        Commands::Version => {
            println!("tfstated v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

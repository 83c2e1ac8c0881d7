//! The `checksum` command: print the digest of a state file.

use std::path::Path;
use tfstated_core::Checksum;

/// Prints the checksum the backend would assign to `file`'s content.
pub fn run(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read(file)?;
    println!("{}", Checksum::of(&content));
    Ok(())
}

//! CLI subcommand implementations.

pub mod checksum;
pub mod serve;

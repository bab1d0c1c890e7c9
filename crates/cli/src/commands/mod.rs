//! CLI subcommand implementations.

pub mod stores;
pub mod token;

//! Subcommand implementations

pub mod config;
pub mod delete;
pub mod export;
pub mod generate;
pub mod nest;
pub mod prune;
pub mod verify;

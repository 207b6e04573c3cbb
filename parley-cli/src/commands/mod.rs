//! CLI subcommand implementations.

pub mod chat;
pub mod completion;
pub mod config;

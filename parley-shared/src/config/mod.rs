//! # Configuration
//!
//! Configuration structures and loading for the Parley client.

pub mod client;

pub use client::{Config, ConfigError};

//! # Configuration
//!
//! Client-side settings: where the API lives, how long to wait for it, where
//! the credential is kept, and how to log.

/// Layered file and environment configuration.
pub mod client;

pub use client::{Config, ConfigError, LogFormat, LoggingConfig};

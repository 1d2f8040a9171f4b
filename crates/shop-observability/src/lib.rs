//! Tracing setup for the storefront tools.
//!
//! This crate provides:
//! - `LogFormat` / `LogLevel` - Output format and default verbosity
//! - `LoggingConfig` - The `[log]` configuration section
//! - `init_tracing` - Installs the global subscriber

mod logging;

pub use logging::*;

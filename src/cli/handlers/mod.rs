//! Command handlers for CLI operations
//!
//! Separates command execution logic from parsing and validation.

pub mod serve;

pub use serve::ServeCommandHandler;

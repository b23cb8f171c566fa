//! Error handling module
//!
//! This module defines the error taxonomy for configuration resolution and
//! the result type alias used in the crate.

use std::io;
use thiserror::Error;

/// Trust configuration error type
///
/// Structural failures (`ResourceNotFound`, `MalformedDocument`) abort a
/// resolution pass immediately. Per-key and per-entry defects are deferred
/// and surfaced together in a single `Configuration` error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error while reading a document source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Neither a filesystem file nor a bundled resource matched the
    /// requested document source
    #[error("Configuration resource not found: {0}")]
    ResourceNotFound(String),

    /// The source produced a stream but the parser could not produce a tree
    #[error("Malformed configuration document {origin}: {detail}")]
    MalformedDocument { origin: String, detail: String },

    /// One or more validation or structural defects found in one resolution
    /// pass, newline-separated, suitable for display to an operator as-is
    #[error("Configuration from {origin} contains error(s):\n{report}")]
    Configuration { origin: String, report: String },

    /// Copying a resolved configuration failed. Always a programming
    /// environment defect, never bad operator input.
    #[error("Failed to copy configuration: {0}")]
    CloneFailure(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `ConfigError`.
pub type Result<T> = std::result::Result<T, ConfigError>;

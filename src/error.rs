//! Error types for avlfile
//!
//! Provides a unified error type for all tree file operations.

use thiserror::Error;

/// Result type alias using AvlError
pub type Result<T> = std::result::Result<T, AvlError>;

/// Unified error type for avlfile operations
///
/// Duplicate keys and missing capabilities are not errors: `insert` reports
/// a duplicate as `Ok(false)` and gated operations degrade to no-ops.
#[derive(Debug, Error)]
pub enum AvlError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for AvlError {
    fn from(err: bincode::Error) -> Self {
        AvlError::Serialization(err.to_string())
    }
}

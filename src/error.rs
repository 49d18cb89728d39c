//! Error types for sbtcell
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SbtError
pub type Result<T> = std::result::Result<T, SbtError>;

/// Unified error type for sbtcell operations
#[derive(Debug, Error)]
pub enum SbtError {
    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // -------------------------------------------------------------------------
    // Cell Errors
    // -------------------------------------------------------------------------
    #[error("Cell capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Cell underflow: {0}")]
    CellUnderflow(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Unknown operation: 0x{0:08x}")]
    UnknownOperation(u32),

    // -------------------------------------------------------------------------
    // I/O & Serialization Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

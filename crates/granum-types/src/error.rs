//! Error types for the Granum control layer.
//!
//! All crates return `GranumResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Granum control layer.
#[derive(Debug, Error)]
pub enum GranumError {
    /// State cannot be serialized: an array length or shape disagrees
    /// with its declared count, or a bond endpoint is out of range.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Byte stream cannot be deserialized: truncated input or a count
    /// field implying an implausible allocation.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The status sidecar for a simulation is missing or malformed.
    /// Non-fatal — callers treat this as "no snapshots yet".
    #[error("Status unavailable: {0}")]
    StatusUnavailable(String),

    /// The external simulator exited with a nonzero status.
    #[error("External simulator failed with exit code {code}")]
    ExternalProcess {
        /// Exit code reported by the operating system.
        code: i32,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A state invariant was violated (lockstep array lengths, wall
    /// count bounds, fluid grid shape).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for `Result<T, GranumError>`.
pub type GranumResult<T> = Result<T, GranumError>;

//! Error types for payload decoding in paxcount-types.

use thiserror::Error;

/// Errors that can occur when decoding a PAX counter payload.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The payload string is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded buffer is too short to hold both counters.
    #[error("truncated payload: requires {expected} bytes, got {actual}")]
    InsufficientBytes {
        /// Bytes needed for a complete reading.
        expected: usize,
        /// Bytes actually present after decoding.
        actual: usize,
    },
}

/// Result type alias using paxcount-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

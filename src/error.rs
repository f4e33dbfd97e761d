//! Error taxonomy for the codec.
//!
//! Configuration and validation errors fail fast, before any cryptographic
//! work. During decode discovery, per-image structural problems are recovered
//! locally (skip and warn); authentication, integrity, and incompleteness
//! errors abort the entire reconstruction.

use thiserror::Error;

/// All failure modes of the encode/decode boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Invalid runtime configuration, e.g. a non-positive chunk size.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Master key is missing, malformed, or degenerate.
    #[error("invalid master key: {0}")]
    InvalidKey(String),

    /// User id is empty, too long, or contains forbidden characters.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    /// Original filename is empty, too long, or contains forbidden characters.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// Input payload is zero-length.
    #[error("input is empty")]
    EmptyInput,

    /// Serialized header does not fit the fixed header budget.
    #[error("header JSON is {size} bytes, exceeds the {max} byte budget")]
    HeaderTooLarge { size: usize, max: usize },

    /// Frame bytes are structurally unusable: too small, bad length prefix,
    /// unparseable header, or truncated ciphertext.
    #[error("corrupt frame: {0}")]
    CorruptFrame(String),

    /// Header parsed but carries an unknown magic string or version.
    #[error("unsupported frame format: magic {magic:?}, version {version}")]
    UnsupportedFormat { magic: String, version: u32 },

    /// Cipher setup or encryption failed. Does not indicate tampering.
    #[error("cipher failure: {0}")]
    Crypto(String),

    /// AEAD tag verification failed: wrong key, wrong user id, or tampering.
    #[error("authentication failed for chunk {index}: wrong key, wrong user id, or tampered data")]
    Authentication { index: u32 },

    /// Decrypted plaintext does not match the SHA-256 recorded at encode time.
    #[error("integrity check failed for chunk {index}: plaintext hash mismatch")]
    Integrity { index: u32 },

    /// Chunk indices are missing or gapped; reconstruction refuses to guess.
    #[error("incomplete chunk set: expected {expected} chunks, found {found}")]
    IncompleteSet { expected: u32, found: u32 },

    /// No candidate image contained a parseable frame.
    #[error("no valid frames found among {scanned} candidate images")]
    NoFrames { scanned: usize },

    /// Chunk is flagged compressed but decompression failed.
    #[error("decompression failed for chunk {index}: {reason}")]
    Decompression { index: u32, reason: String },
}

/// Convenience alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CodecError>;

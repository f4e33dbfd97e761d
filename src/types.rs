//! Common type definitions for the encode/decode boundary.

use image::RgbImage;

use crate::config::{DEFAULT_MAX_CHUNK_BYTES, MAX_WIDTH};

/// Caller-supplied options for an encode operation.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Maximum raw payload bytes per image chunk.
    pub max_chunk_bytes: usize,

    /// Whether to attempt zstd compression per chunk.
    pub compress: bool,

    /// Maximum carrier image width in pixels.
    pub max_width: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES, compress: true, max_width: MAX_WIDTH }
    }
}

/// One carrier image produced by an encode operation.
pub struct EncodedImage {
    /// Zero-based chunk position within the set.
    pub chunk_index: u32,

    /// Total number of chunks in the set.
    pub total_chunks: u32,

    /// Size of the embedded frame in bytes, before pixel padding.
    pub payload_len: usize,

    /// The packed carrier image.
    pub image: RgbImage,
}

/// A candidate image offered to the decoder.
///
/// The label identifies the source (typically a file name) in warnings and
/// skip reports; it carries no authority over decoding.
pub struct Candidate {
    pub label: String,
    pub image: RgbImage,
}

/// A candidate that was skipped during decode discovery, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedImage {
    pub label: String,
    pub reason: String,
}

/// The result of a successful decode.
pub struct DecodedPayload {
    /// The reconstructed original payload, byte-for-byte.
    pub bytes: Vec<u8>,

    /// Original filename recovered from the frame headers.
    pub filename: String,

    /// Number of chunks the payload was reassembled from.
    pub total_chunks: u32,

    /// Whether any chunk was stored compressed.
    pub compressed: bool,

    /// Candidates skipped during discovery. Non-fatal; reported so callers
    /// can surface unexpected strays.
    pub skipped: Vec<SkippedImage>,
}

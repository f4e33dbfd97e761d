//! Plaintext chunk header: the self-describing metadata at the front of
//! every frame.
//!
//! The header is serialized as compact, key-sorted JSON and authenticated as
//! AEAD associated data, so every field is tamper-evident even though none
//! of it is encrypted. Do not put anything sensitive in the filename or
//! user id.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::{MAGIC, PROTOCOL_VERSION};
use crate::error::{CodecError, Result};

/// Per-chunk metadata, bound to the ciphertext via AAD.
///
/// Fields are declared in key-sorted order so that `serde_json`'s
/// declaration-order output is byte-identical to the canonical key-sorted
/// compact encoding the wire format requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkHeader {
    /// Whether the ciphertext holds a zstd-compressed payload.
    pub compressed: bool,
    /// Format identifier, always [`MAGIC`] for frames we produce.
    pub magic: String,
    /// Zero-based position of this chunk in the original payload.
    pub orig_chunk_index: u32,
    /// Size of the pre-compression plaintext chunk in bytes.
    pub orig_chunk_size: u64,
    /// Original payload filename.
    pub orig_filename: String,
    /// Total number of chunks in the set.
    pub orig_total_chunks: u32,
    /// Hex SHA-256 of the pre-compression plaintext chunk.
    pub sha256: String,
    /// Unix timestamp of encoding.
    pub ts: u64,
    /// User id the key was derived for.
    pub user_id: String,
    /// Frame protocol version.
    pub version: u32,
}

impl ChunkHeader {
    /// Builds a header for one chunk. The `compressed` flag and `sha256`
    /// digest are filled in by the frame builder.
    pub fn new(
        user_id: &str,
        orig_filename: &str,
        orig_chunk_index: u32,
        orig_total_chunks: u32,
        orig_chunk_size: u64,
    ) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            compressed: false,
            magic: MAGIC.to_owned(),
            orig_chunk_index,
            orig_chunk_size,
            orig_filename: orig_filename.to_owned(),
            orig_total_chunks,
            sha256: String::new(),
            ts,
            user_id: user_id.to_owned(),
            version: PROTOCOL_VERSION,
        }
    }

    /// Serializes to the canonical compact JSON encoding.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| CodecError::CorruptFrame(format!("header serialization failed: {e}")))
    }

    /// Parses a header from raw JSON bytes and checks magic and version.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let header: Self = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::CorruptFrame(format!("header JSON invalid: {e}")))?;

        if header.magic != MAGIC || header.version != PROTOCOL_VERSION {
            return Err(CodecError::UnsupportedFormat {
                magic: header.magic,
                version: header.version,
            });
        }

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_compact_and_key_sorted() {
        let mut header = ChunkHeader::new("alice", "song.wav", 0, 3, 120);
        header.ts = 1_700_000_000;
        header.sha256 = "ab".repeat(32);

        let json = String::from_utf8(header.to_json().unwrap()).unwrap();
        let expected = format!(
            "{{\"compressed\":false,\"magic\":\"AUDIO-IMG-V1\",\"orig_chunk_index\":0,\
             \"orig_chunk_size\":120,\"orig_filename\":\"song.wav\",\"orig_total_chunks\":3,\
             \"sha256\":\"{}\",\"ts\":1700000000,\"user_id\":\"alice\",\"version\":1}}",
            "ab".repeat(32)
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut header = ChunkHeader::new("bob", "take2.flac", 4, 9, 777);
        header.compressed = true;
        header.sha256 = "00".repeat(32);

        let parsed = ChunkHeader::from_json(&header.to_json().unwrap()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_unknown_magic_rejected() {
        let mut header = ChunkHeader::new("alice", "song.wav", 0, 1, 10);
        header.magic = "NOT-AUDIO".to_owned();

        let bytes = serde_json::to_vec(&header).unwrap();
        assert!(matches!(
            ChunkHeader::from_json(&bytes),
            Err(CodecError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut header = ChunkHeader::new("alice", "song.wav", 0, 1, 10);
        header.version = 99;

        let bytes = serde_json::to_vec(&header).unwrap();
        assert!(matches!(
            ChunkHeader::from_json(&bytes),
            Err(CodecError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ChunkHeader::from_json(b"{\"magic\":"),
            Err(CodecError::CorruptFrame(_))
        ));
    }
}

//! zstd compression and decompression for chunk payloads.

use std::io;

use crate::config::ZSTD_LEVEL;

/// Compresses data with zstd at the protocol's fixed level.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::encode_all(data, ZSTD_LEVEL)
}

/// Decompresses zstd-compressed data.
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::decode_all(data)
}

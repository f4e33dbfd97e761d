//! Global configuration constants.
//!
//! This module contains all parameters used throughout aicarrier: the frame
//! wire format, cryptographic sizes, pixel-packing geometry, chunking policy,
//! and input validation limits.
//!
//! ## Compatibility
//!
//! The frame-format constants (`MAGIC`, `PROTOCOL_VERSION`, `HEADER_BUDGET`,
//! `SENTINEL`, nonce/tag sizes, `HKDF_INFO`) define the on-wire protocol.
//! Changing any of them produces images that existing decoders cannot read.

/// Application name used in user interfaces and log output.
pub const APP_NAME: &str = "aicarrier";

// === Frame format ===

/// Magic string identifying a carrier frame header.
///
/// Checked during decode to verify format compatibility and to skip
/// unrelated image files found in the same directory.
pub const MAGIC: &str = "AUDIO-IMG-V1";

/// Current frame protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

/// Bytes reserved at the start of every frame for the metadata header.
///
/// The region holds a 4-byte little-endian length prefix, the compact JSON
/// header, and zero padding up to this budget. The header is stored in
/// plaintext but bound to the ciphertext as AEAD associated data, so any
/// modification fails authentication.
pub const HEADER_BUDGET: usize = 1024;

/// Size of the header length prefix in bytes.
pub const HEADER_LEN_PREFIX: usize = 4;

/// End-of-ciphertext marker appended after the authentication tag.
///
/// Bounds the ciphertext inside the zero-padded pixel buffer during parsing.
/// Collision probability inside legitimate ciphertext is ~2^-64.
pub const SENTINEL: &[u8; 8] = b"AIMGEND1";

// === Cryptography ===

/// Size of the master key and of derived keys in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes.
///
/// 96 bits is the recommended GCM nonce size. A fresh random nonce is
/// generated per frame and must never repeat under the same derived key.
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// HKDF context string binding derived keys to this protocol.
///
/// Changing this value breaks compatibility with every existing image.
pub const HKDF_INFO: &[u8] = b"AUDIO-IMG-V1";

/// Minimum number of distinct byte values expected in a master key.
///
/// Fewer suggests a patterned or hand-typed key rather than CSPRNG output.
pub const MIN_KEY_DISTINCT_BYTES: usize = 16;

// === Pixel packing ===

/// Bytes stored per pixel (RGB).
pub const PIXEL_BYTES: usize = 3;

/// Maximum carrier image width in pixels.
///
/// Frames wider than this grow downward instead; 8192 keeps images within
/// common decoder limits while avoiding degenerate tall-and-narrow rasters.
pub const MAX_WIDTH: u32 = 8192;

// === Chunking policy ===

/// Default maximum raw payload bytes per image chunk (50 MiB).
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 50 * 1024 * 1024;

/// Audio duration below which the whole input is encoded as a single chunk.
///
/// Trades peak memory for avoiding unnecessary splitting of typical files;
/// only applies when the duration probe recognizes the input.
pub const SINGLE_CHUNK_MAX_SECS: u64 = 8 * 3600;

// === Compression ===

/// zstd compression level for chunk payloads.
///
/// Level 3 is the usual speed/ratio sweet spot for audio data. Compressed
/// output is kept only when strictly smaller than the raw chunk.
pub const ZSTD_LEVEL: i32 = 3;

// === Validation limits ===

/// Maximum user id length in bytes.
pub const MAX_USER_ID_LENGTH: usize = 255;

/// Maximum original filename length in bytes.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Characters rejected in user ids and filenames.
///
/// Blocks path traversal and shell/filesystem metacharacters; `..` is
/// rejected separately as a substring.
pub const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0', '<', '>', ':', '"', '|', '?', '*'];

/// Environment variable consulted for the master key when no CLI argument
/// is given.
pub const MASTER_KEY_ENV: &str = "AICARRIER_MASTER_KEY_HEX";

//! Frame codec: builds and parses the encrypted, self-describing byte
//! sequence that one image carries.
//!
//! Frame layout:
//!
//! ```text
//! [4B LE header len][header JSON][zero pad to 1024][12B nonce]
//! [ciphertext || 16B tag][8B sentinel]
//! ```
//!
//! The header JSON is the AEAD associated data, which binds every metadata
//! field to the ciphertext: any header modification fails authentication.
//! The sentinel bounds the ciphertext inside the zero-padded pixel buffer;
//! the outer buffer length is never a framing authority.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::compression;
use crate::config::{HEADER_BUDGET, HEADER_LEN_PREFIX, NONCE_SIZE, SENTINEL, TAG_SIZE};
use crate::error::{CodecError, Result};
use crate::header::ChunkHeader;
use crate::key::{DerivedKey, random_bytes};

/// Hex-encoded SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CodecError::Crypto(format!("cipher init failed: {e}")))
}

/// Builds the frame for one chunk.
///
/// The SHA-256 recorded in the header is always computed over the
/// pre-compression plaintext. Compression is kept only when it is strictly
/// smaller than the raw chunk; a compressor failure falls back to raw.
pub fn build(
    chunk: &[u8],
    key: &DerivedKey,
    mut header: ChunkHeader,
    compress: bool,
) -> Result<Vec<u8>> {
    if chunk.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    header.sha256 = sha256_hex(chunk);

    let mut plain: &[u8] = chunk;
    let compressed_buf;
    if compress {
        match compression::compress(chunk) {
            Ok(candidate) if candidate.len() < chunk.len() => {
                compressed_buf = candidate;
                plain = &compressed_buf;
                header.compressed = true;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(chunk = header.orig_chunk_index, error = %e, "compression failed, storing raw");
            }
        }
    }

    let header_json = header.to_json()?;
    if header_json.len() + HEADER_LEN_PREFIX > HEADER_BUDGET {
        return Err(CodecError::HeaderTooLarge {
            size: header_json.len() + HEADER_LEN_PREFIX,
            max: HEADER_BUDGET,
        });
    }

    let nonce_bytes: [u8; NONCE_SIZE] = random_bytes();
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher_for(key)?
        .encrypt(nonce, Payload { msg: plain, aad: &header_json })
        .map_err(|e| CodecError::Crypto(format!("encryption failed: {e}")))?;

    let mut frame = Vec::with_capacity(HEADER_BUDGET + NONCE_SIZE + ciphertext.len() + SENTINEL.len());
    frame.extend_from_slice(&u32::try_from(header_json.len()).expect("header fits u32").to_le_bytes());
    frame.extend_from_slice(&header_json);
    frame.resize(HEADER_BUDGET, 0);
    frame.extend_from_slice(&nonce_bytes);
    frame.extend_from_slice(&ciphertext);
    frame.extend_from_slice(SENTINEL);

    Ok(frame)
}

/// A structurally valid frame whose header has been parsed but whose
/// ciphertext has not yet been authenticated.
pub struct ParsedFrame {
    pub header: ChunkHeader,
    /// Exact header bytes from the frame, reused verbatim as AAD. The header
    /// must not be re-serialized for decryption.
    header_json: Vec<u8>,
    /// Everything past the header budget: nonce, ciphertext, sentinel, and
    /// any pixel zero padding.
    body: Vec<u8>,
}

/// Parses the plaintext header region of a frame.
///
/// Only structural and format checks happen here; nothing is trusted until
/// [`decrypt`] authenticates the frame.
pub fn parse(frame: &[u8]) -> Result<ParsedFrame> {
    if frame.len() < HEADER_BUDGET + NONCE_SIZE {
        return Err(CodecError::CorruptFrame(format!(
            "frame is {} bytes, below the {} byte minimum",
            frame.len(),
            HEADER_BUDGET + NONCE_SIZE
        )));
    }

    let header_len =
        u32::from_le_bytes(frame[..HEADER_LEN_PREFIX].try_into().expect("prefix is 4 bytes")) as usize;
    if header_len == 0 || header_len > HEADER_BUDGET - HEADER_LEN_PREFIX {
        return Err(CodecError::CorruptFrame(format!("invalid header length {header_len}")));
    }

    let header_json = frame[HEADER_LEN_PREFIX..HEADER_LEN_PREFIX + header_len].to_vec();
    let header = ChunkHeader::from_json(&header_json)?;

    Ok(ParsedFrame { header, header_json, body: frame[HEADER_BUDGET..].to_vec() })
}

/// Decrypts and verifies a parsed frame, returning the plaintext chunk.
///
/// The ciphertext is bounded by scanning for the sentinel from the tail;
/// zero padding behind the sentinel never reaches the cipher. If the
/// sentinel is absent, trailing zero bytes are trimmed instead — a legacy
/// heuristic that can misparse ciphertext genuinely ending in zeros, kept
/// for compatibility with frames written before the sentinel existed.
pub fn decrypt(parsed: &ParsedFrame, key: &DerivedKey) -> Result<Vec<u8>> {
    let index = parsed.header.orig_chunk_index;
    let body = &parsed.body;

    let nonce = Nonce::from_slice(&body[..NONCE_SIZE]);
    let rest = &body[NONCE_SIZE..];

    let ciphertext = match rest.windows(SENTINEL.len()).rposition(|w| w == SENTINEL) {
        Some(end) => &rest[..end],
        None => {
            warn!(chunk = index, "sentinel missing, trimming trailing zeros");
            match rest.iter().rposition(|&b| b != 0) {
                Some(last) => &rest[..=last],
                None => rest,
            }
        }
    };

    if ciphertext.len() < TAG_SIZE {
        return Err(CodecError::CorruptFrame(format!(
            "ciphertext is {} bytes, shorter than the auth tag",
            ciphertext.len()
        )));
    }

    let plaintext = cipher_for(key)?
        .decrypt(nonce, Payload { msg: ciphertext, aad: &parsed.header_json })
        .map_err(|_| CodecError::Authentication { index })?;

    let plaintext = if parsed.header.compressed {
        compression::decompress(&plaintext)
            .map_err(|e| CodecError::Decompression { index, reason: e.to_string() })?
    } else {
        plaintext
    };

    if sha256_hex(&plaintext) != parsed.header.sha256 {
        return Err(CodecError::Integrity { index });
    }

    Ok(plaintext)
}

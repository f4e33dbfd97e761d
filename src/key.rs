//! Key management: validation and HKDF-SHA256 derivation.
//!
//! Every operation derives a fresh per-user key from the caller's master key;
//! nothing is cached or persisted. Different user ids under the same master
//! key yield unrelated keys, and a derived key cannot be inverted to recover
//! the master key.

use hkdf::Hkdf;
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::config::{
    FORBIDDEN_CHARS, HKDF_INFO, KEY_SIZE, MAX_FILENAME_LENGTH, MAX_USER_ID_LENGTH,
    MIN_KEY_DISTINCT_BYTES,
};
use crate::error::{CodecError, Result};

/// A 256-bit per-user encryption key.
///
/// Zeroized on drop so key material does not linger in memory after an
/// operation completes.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").field("bytes", &"[REDACTED]").finish()
    }
}

/// Fills a fixed-size array from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes);
    bytes
}

/// Validates a caller-supplied master key.
///
/// Rejects keys of the wrong length outright, and degenerate keys (all-zero
/// or with very few distinct byte values) as an advisory against patterned,
/// non-random key material.
pub fn validate_master_key(master_key: &[u8]) -> Result<()> {
    if master_key.len() != KEY_SIZE {
        return Err(CodecError::InvalidKey(format!(
            "expected {KEY_SIZE} bytes, got {}",
            master_key.len()
        )));
    }

    if master_key.iter().all(|&b| b == 0) {
        return Err(CodecError::InvalidKey("key is all zeros".into()));
    }

    let mut seen = [false; 256];
    for &b in master_key {
        seen[b as usize] = true;
    }
    let distinct = seen.iter().filter(|&&s| s).count();
    if distinct < MIN_KEY_DISTINCT_BYTES {
        return Err(CodecError::InvalidKey(format!(
            "only {distinct} distinct byte values, key looks patterned"
        )));
    }

    Ok(())
}

/// Validates and trims a user id, returning the trimmed form.
///
/// The user id is bound into key derivation and stored in the plaintext
/// header, so it must be free of path-traversal and control characters.
pub fn validate_user_id(user_id: &str) -> Result<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CodecError::InvalidUserId("user id is empty".into()));
    }

    if trimmed.len() > MAX_USER_ID_LENGTH {
        return Err(CodecError::InvalidUserId(format!(
            "user id exceeds {MAX_USER_ID_LENGTH} bytes"
        )));
    }

    check_forbidden(trimmed).map_err(CodecError::InvalidUserId)?;

    Ok(trimmed)
}

/// Validates an original filename recorded in the frame header.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(CodecError::InvalidFilename("filename is empty".into()));
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(CodecError::InvalidFilename(format!(
            "filename exceeds {MAX_FILENAME_LENGTH} bytes"
        )));
    }

    check_forbidden(filename).map_err(CodecError::InvalidFilename)
}

fn check_forbidden(value: &str) -> std::result::Result<(), String> {
    if value.contains("..") {
        return Err("contains path traversal sequence '..'".into());
    }

    if let Some(c) = value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(format!("contains forbidden character {c:?}"));
    }

    if value.chars().any(char::is_control) {
        return Err("contains control characters".into());
    }

    Ok(())
}

/// Derives the per-user key: HKDF-SHA256(IKM = master_key || user_id,
/// salt = none, info = [`HKDF_INFO`], length = 32).
///
/// Deterministic and one-way; both inputs are validated before any key
/// material is touched.
pub fn derive_key(master_key: &[u8], user_id: &str) -> Result<DerivedKey> {
    validate_master_key(master_key)?;
    let user_id = validate_user_id(user_id)?;

    let mut ikm = Vec::with_capacity(master_key.len() + user_id.len());
    ikm.extend_from_slice(master_key);
    ikm.extend_from_slice(user_id.as_bytes());

    let hkdf = Hkdf::<Sha256>::new(None, &ikm);
    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(HKDF_INFO, &mut okm)
        .map_err(|e| CodecError::Crypto(format!("HKDF expand failed: {e}")))?;

    ikm.zeroize();

    Ok(DerivedKey { bytes: okm })
}

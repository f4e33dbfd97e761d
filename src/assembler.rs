//! Chunk assembly: discovers, orders, validates, and reassembles chunks on
//! decode.
//!
//! Discovery tolerates unrelated files: any candidate whose pixels do not
//! parse as a frame is skipped with a recorded warning. Everything after
//! discovery is strict — a missing or gapped index, a failed authentication,
//! or a hash mismatch aborts the whole reconstruction. No partial output is
//! ever returned as if valid.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{CodecError, Result};
use crate::frame::{self, ParsedFrame};
use crate::key::derive_key;
use crate::pixels;
use crate::types::{Candidate, DecodedPayload, SkippedImage};

/// Reassembles the original payload from candidate images.
pub fn assemble(candidates: &[Candidate], user_id: &str, master_key: &[u8]) -> Result<DecodedPayload> {
    // Validate credentials before touching any pixels.
    let key = derive_key(master_key, user_id)?;

    let mut frames: Vec<(String, ParsedFrame)> = Vec::new();
    let mut skipped: Vec<SkippedImage> = Vec::new();

    for candidate in candidates {
        let payload = pixels::unpack(&candidate.image);
        match frame::parse(&payload) {
            Ok(parsed) => frames.push((candidate.label.clone(), parsed)),
            Err(e) => {
                warn!(label = %candidate.label, error = %e, "skipping candidate image");
                skipped.push(SkippedImage { label: candidate.label.clone(), reason: e.to_string() });
            }
        }
    }

    if frames.is_empty() {
        return Err(CodecError::NoFrames { scanned: candidates.len() });
    }

    frames.sort_by_key(|(_, parsed)| parsed.header.orig_chunk_index);

    let expected = frames[0].1.header.orig_total_chunks;
    if frames.iter().any(|(_, p)| p.header.orig_total_chunks != expected) {
        return Err(CodecError::CorruptFrame(
            "frames disagree on the total chunk count".into(),
        ));
    }

    let found = u32::try_from(frames.len()).unwrap_or(u32::MAX);
    let contiguous = frames
        .iter()
        .enumerate()
        .all(|(i, (_, p))| p.header.orig_chunk_index as usize == i);
    if found != expected || !contiguous {
        return Err(CodecError::IncompleteSet { expected, found });
    }

    // Chunks are independent; decrypt in parallel, order preserved by the
    // indexed collect.
    let plaintexts: Vec<Vec<u8>> = frames
        .par_iter()
        .map(|(_, parsed)| frame::decrypt(parsed, &key))
        .collect::<Result<_>>()?;

    let mut bytes = Vec::with_capacity(plaintexts.iter().map(Vec::len).sum());
    for plaintext in &plaintexts {
        bytes.extend_from_slice(plaintext);
    }

    let first = &frames[0].1.header;
    info!(
        chunks = expected,
        bytes = bytes.len(),
        filename = %first.orig_filename,
        "reassembled payload"
    );

    Ok(DecodedPayload {
        bytes,
        filename: first.orig_filename.clone(),
        total_chunks: expected,
        compressed: frames.iter().any(|(_, p)| p.header.compressed),
        skipped,
    })
}

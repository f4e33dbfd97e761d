//! Chunk planning: splits the input into the byte ranges that become images.

use std::ops::Range;
use std::time::Duration;

use tracing::debug;

use crate::config::SINGLE_CHUNK_MAX_SECS;
use crate::error::{CodecError, Result};
use crate::wav::DurationProbe;

/// Plans the ordered, contiguous byte ranges to encode, one per image.
///
/// Short audio files (probe-measured duration under
/// [`SINGLE_CHUNK_MAX_SECS`]) are kept whole regardless of
/// `max_chunk_bytes`, trading memory for fewer images. Everything else is
/// split into `ceil(len / max_chunk_bytes)` contiguous ranges.
pub fn plan(
    input: &[u8],
    max_chunk_bytes: usize,
    probe: &dyn DurationProbe,
) -> Result<Vec<Range<usize>>> {
    if input.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    if max_chunk_bytes == 0 {
        return Err(CodecError::Config("max_chunk_bytes must be positive".into()));
    }

    if let Some(duration) = probe.duration(input) {
        debug!(secs = duration.as_secs_f64(), "measured payload duration");
        if duration < Duration::from_secs(SINGLE_CHUNK_MAX_SECS) {
            return Ok(vec![0..input.len()]);
        }
    }

    let ranges = (0..input.len())
        .step_by(max_chunk_bytes)
        .map(|start| start..usize::min(start + max_chunk_bytes, input.len()))
        .collect();

    Ok(ranges)
}

//! Duration probing for chunking policy.
//!
//! The planner only needs a rough answer to one question: is this payload a
//! short audio file? Probes are injected as a capability so availability is
//! an ordinary branch rather than a runtime import check, and so tests can
//! substitute fixed answers.

use std::time::Duration;

/// Measures the playback duration of a payload, if the format is recognized.
pub trait DurationProbe: Sync {
    /// Returns the duration, or `None` when the payload cannot be measured.
    fn duration(&self, bytes: &[u8]) -> Option<Duration>;
}

/// Probe that never recognizes anything. Forces byte-based chunking.
pub struct NoProbe;

impl DurationProbe for NoProbe {
    fn duration(&self, _bytes: &[u8]) -> Option<Duration> {
        None
    }
}

/// RIFF/WAVE header probe.
///
/// Walks the chunk list for `fmt ` (byte rate) and `data` (payload size) and
/// computes duration as `data_size / byte_rate`. Any structural oddity yields
/// `None`; a file we cannot measure is simply chunked by size.
pub struct WavProbe;

impl DurationProbe for WavProbe {
    fn duration(&self, bytes: &[u8]) -> Option<Duration> {
        if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return None;
        }

        let mut byte_rate: Option<u32> = None;
        let mut data_size: Option<u32> = None;

        let mut offset = 12usize;
        while offset + 8 <= bytes.len() {
            let id = &bytes[offset..offset + 4];
            let size = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().ok()?);

            match id {
                b"fmt " => {
                    // byte rate sits at offset 8 of the fmt body
                    if offset + 8 + 12 > bytes.len() {
                        return None;
                    }
                    byte_rate = Some(u32::from_le_bytes(
                        bytes[offset + 16..offset + 20].try_into().ok()?,
                    ));
                }
                b"data" => {
                    data_size = Some(size);
                }
                _ => {}
            }

            if let (Some(rate), Some(data)) = (byte_rate, data_size) {
                if rate == 0 {
                    return None;
                }
                return Some(Duration::from_secs_f64(f64::from(data) / f64::from(rate)));
            }

            // chunks are word-aligned
            let advance = 8 + size as usize + (size as usize & 1);
            offset = offset.checked_add(advance)?;
        }

        None
    }
}

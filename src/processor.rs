//! High-level encode and decode operations — the boundary that transports
//! (CLI, HTTP) call.

use rayon::prelude::*;
use tracing::info;

use crate::assembler;
use crate::error::Result;
use crate::frame;
use crate::header::ChunkHeader;
use crate::key::{derive_key, validate_filename};
use crate::pixels;
use crate::planner;
use crate::types::{Candidate, DecodedPayload, EncodeOptions, EncodedImage};
use crate::wav::WavProbe;

/// Encrypts a payload into a set of carrier images.
///
/// Validation runs before any cryptographic work. Chunks are independent and
/// are framed and packed in parallel; the returned images are ordered by
/// chunk index. On error the caller must discard any partial results.
pub fn encode(
    input: &[u8],
    filename: &str,
    user_id: &str,
    master_key: &[u8],
    options: &EncodeOptions,
) -> Result<Vec<EncodedImage>> {
    validate_filename(filename)?;
    let key = derive_key(master_key, user_id)?;

    let ranges = planner::plan(input, options.max_chunk_bytes, &WavProbe)?;
    let total = u32::try_from(ranges.len()).unwrap_or(u32::MAX);

    let images: Vec<EncodedImage> = ranges
        .par_iter()
        .enumerate()
        .map(|(index, range)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            let chunk = &input[range.clone()];
            let header = ChunkHeader::new(user_id.trim(), filename, index, total, chunk.len() as u64);

            let frame = frame::build(chunk, &key, header, options.compress)?;
            let image = pixels::pack(&frame, options.max_width)?;

            Ok(EncodedImage { chunk_index: index, total_chunks: total, payload_len: frame.len(), image })
        })
        .collect::<Result<_>>()?;

    info!(chunks = total, input_bytes = input.len(), "encoded payload");

    Ok(images)
}

/// Decrypts and reassembles a payload from candidate images.
///
/// Returns either one complete result or the first fatal error; candidates
/// that are not frames at all are skipped and reported, never fatal.
pub fn decode(candidates: &[Candidate], user_id: &str, master_key: &[u8]) -> Result<DecodedPayload> {
    assembler::assemble(candidates, user_id, master_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEY_SIZE;
    use crate::error::CodecError;

    fn test_master() -> [u8; KEY_SIZE] {
        std::array::from_fn(|i| (i as u8).wrapping_mul(31).wrapping_add(5))
    }

    fn to_candidates(images: Vec<EncodedImage>) -> Vec<Candidate> {
        images
            .into_iter()
            .map(|enc| Candidate { label: format!("part{:04}.png", enc.chunk_index + 1), image: enc.image })
            .collect()
    }

    fn roundtrip(payload: &[u8], options: &EncodeOptions) -> DecodedPayload {
        let images = encode(payload, "clip.wav", "test", &test_master(), options).unwrap();
        decode(&to_candidates(images), "test", &test_master()).unwrap()
    }

    #[test]
    fn test_roundtrip_single_chunk() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let decoded = roundtrip(&payload, &EncodeOptions::default());
        assert_eq!(decoded.bytes, payload);
        assert_eq!(decoded.total_chunks, 1);
        assert_eq!(decoded.filename, "clip.wav");
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn test_roundtrip_multi_chunk() {
        let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let options = EncodeOptions { max_chunk_bytes: 7_000, ..EncodeOptions::default() };
        let decoded = roundtrip(&payload, &options);
        assert_eq!(decoded.bytes, payload);
        assert_eq!(decoded.total_chunks, 8);
    }

    #[test]
    fn test_concrete_scenario_120_bytes() {
        // 120 bytes at 50 bytes per chunk: three images, indices 0..3
        let payload: Vec<u8> = (0..120u8).collect();
        let options = EncodeOptions { max_chunk_bytes: 50, ..EncodeOptions::default() };

        let images = encode(&payload, "tiny.wav", "test", &test_master(), &options).unwrap();
        assert_eq!(images.len(), 3);
        for (i, image) in images.iter().enumerate() {
            assert_eq!(image.chunk_index as usize, i);
            assert_eq!(image.total_chunks, 3);
        }

        let decoded = decode(&to_candidates(images), "test", &test_master()).unwrap();
        assert_eq!(decoded.bytes, payload);
        assert_eq!(decoded.total_chunks, 3);
    }

    #[test]
    fn test_chunk_count_is_ceil() {
        let options = EncodeOptions { max_chunk_bytes: 64, ..EncodeOptions::default() };
        for len in [1usize, 63, 64, 65, 128, 129] {
            let payload = vec![0xA5u8; len];
            let images = encode(&payload, "x.bin", "test", &test_master(), &options).unwrap();
            assert_eq!(images.len(), len.div_ceil(64), "len={len}");
        }
    }

    #[test]
    fn test_key_isolation_between_users() {
        let payload = vec![1u8; 500];
        let images = encode(&payload, "a.wav", "alice", &test_master(), &EncodeOptions::default()).unwrap();

        let result = decode(&to_candidates(images), "bob", &test_master());
        assert!(matches!(result, Err(CodecError::Authentication { .. })));
    }

    #[test]
    fn test_compression_transparency() {
        let payload = vec![0x11u8; 30_000];

        let raw = EncodeOptions { compress: false, ..EncodeOptions::default() };
        let zipped = EncodeOptions { compress: true, ..EncodeOptions::default() };

        let raw_images = encode(&payload, "a.wav", "test", &test_master(), &raw).unwrap();
        let zipped_images = encode(&payload, "a.wav", "test", &test_master(), &zipped).unwrap();

        assert!(zipped_images[0].payload_len < raw_images[0].payload_len);

        let a = decode(&to_candidates(raw_images), "test", &test_master()).unwrap();
        let b = decode(&to_candidates(zipped_images), "test", &test_master()).unwrap();
        assert_eq!(a.bytes, payload);
        assert_eq!(b.bytes, payload);
        assert!(!a.compressed);
        assert!(b.compressed);
    }

    #[test]
    fn test_encode_empty_input() {
        let result = encode(&[], "a.wav", "test", &test_master(), &EncodeOptions::default());
        assert!(matches!(result, Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_encode_rejects_bad_inputs_before_crypto() {
        let payload = vec![1u8; 10];
        assert!(matches!(
            encode(&payload, "a.wav", "../root", &test_master(), &EncodeOptions::default()),
            Err(CodecError::InvalidUserId(_))
        ));
        assert!(matches!(
            encode(&payload, "a.wav", "test", &[0u8; 16], &EncodeOptions::default()),
            Err(CodecError::InvalidKey(_))
        ));
        assert!(matches!(
            encode(&payload, "bad|name", "test", &test_master(), &EncodeOptions::default()),
            Err(CodecError::InvalidFilename(_))
        ));
    }
}

//! Pixel packing: maps frame bytes to and from an RGB raster grid.
//!
//! Three bytes per pixel, row-major, final pixels zero-padded. The grid aims
//! for a near-square shape capped at a maximum width. Unpacking returns the
//! full `width * height * 3` bytes; the frame's own length prefix and
//! sentinel are the framing authorities, so the trailing padding is harmless.

use image::RgbImage;

use crate::config::PIXEL_BYTES;
use crate::error::{CodecError, Result};

/// Computes the raster dimensions for a payload of `len` bytes.
pub fn dimensions(len: usize, max_width: u32) -> (u32, u32) {
    let pixels_needed = len.div_ceil(PIXEL_BYTES).max(1);

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let square = (pixels_needed as f64).sqrt().ceil() as u32;
    let width = square.clamp(1, max_width);

    let height = u32::try_from(pixels_needed.div_ceil(width as usize)).unwrap_or(u32::MAX);

    (width, height)
}

/// Packs payload bytes into an RGB image, zero-padding the tail.
///
/// Deterministic for a given payload length and `max_width`.
pub fn pack(payload: &[u8], max_width: u32) -> Result<RgbImage> {
    if payload.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    if max_width == 0 {
        return Err(CodecError::Config("max_width must be positive".into()));
    }

    let (width, height) = dimensions(payload.len(), max_width);

    let mut buf = vec![0u8; width as usize * height as usize * PIXEL_BYTES];
    buf[..payload.len()].copy_from_slice(payload);

    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| CodecError::Config("pixel buffer does not match raster dimensions".into()))
}

/// Flattens an RGB image back to its raw `width * height * 3` bytes,
/// row-major.
pub fn unpack(image: &RgbImage) -> Vec<u8> {
    image.as_raw().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_near_square() {
        // 1200 bytes -> 400 pixels -> 20x20
        assert_eq!(dimensions(1200, 8192), (20, 20));
    }

    #[test]
    fn test_dimensions_capped_width() {
        let (width, height) = dimensions(3 * 100 * 100, 10);
        assert_eq!(width, 10);
        assert_eq!(height, 1000);
    }

    #[test]
    fn test_dimensions_partial_pixel() {
        // 4 bytes -> 2 pixels -> 2x1
        assert_eq!(dimensions(4, 8192), (2, 1));
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let image = pack(&payload, 8192).unwrap();

        let bytes = unpack(&image);
        assert_eq!(bytes.len() % PIXEL_BYTES, 0);
        assert_eq!(&bytes[..payload.len()], &payload[..]);
        // tail padding is all zeros
        assert!(bytes[payload.len()..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_deterministic() {
        let payload = vec![7u8; 1000];
        let a = pack(&payload, 64).unwrap();
        let b = pack(&payload, 64).unwrap();
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_pack_empty_rejected() {
        assert!(matches!(pack(&[], 8192), Err(CodecError::EmptyInput)));
    }

    #[test]
    fn test_pack_zero_width_rejected() {
        assert!(matches!(pack(&[1, 2, 3], 0), Err(CodecError::Config(_))));
    }

    #[test]
    fn test_single_byte_payload() {
        let image = pack(&[0xAB], 8192).unwrap();
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(unpack(&image), vec![0xAB, 0, 0]);
    }
}

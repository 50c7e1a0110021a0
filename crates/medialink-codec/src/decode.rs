//! Reading payloads back out of scanned raster images.

use crate::error::CodecResult;

/// Decode a code payload from an arbitrary raster image.
///
/// Returns `Ok(None)` when no code region is detected, the routine case for
/// a blurry photograph or an image with no code at all. When several regions
/// are present, grids are tried in detection order and the first that
/// decodes wins; a grid that fails to decode is skipped. Bytes that are not
/// a readable image are an error.
pub fn decode(image_bytes: &[u8]) -> CodecResult<Option<String>> {
    let luma = image::load_from_memory(image_bytes)?.to_luma8();

    let mut prepared = rqrr::PreparedImage::prepare(luma);
    for grid in prepared.detect_grids() {
        if let Ok((_meta, content)) = grid.decode() {
            return Ok(Some(content));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;
    use crate::payload::extract_identifier;
    use image::{DynamicImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn blank_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::GrayImage::from_pixel(width, height, Luma([0xFF]));
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png
    }

    #[test]
    fn decode_round_trips_encode() {
        let id = "1f4d8a9c-0000-4000-8000-000000000042";
        let encoded = encode(id, "https://x/view").unwrap();
        let payload = decode(&encoded.png).unwrap().expect("code should decode");
        assert_eq!(payload, encoded.payload);
        assert_eq!(extract_identifier(&payload).unwrap(), id);
    }

    #[test]
    fn decode_blank_image_is_none() {
        let png = blank_png(128, 128);
        assert!(decode(&png).unwrap().is_none());
    }

    #[test]
    fn decode_garbage_bytes_is_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("Unreadable image"));
    }

    #[test]
    fn decode_no_lookup_worthy_content_in_noise() {
        // A structured but codeless image: vertical stripes
        let img = image::GrayImage::from_fn(96, 96, |x, _| {
            if x % 2 == 0 {
                Luma([0x00])
            } else {
                Luma([0xFF])
            }
        });
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        assert!(decode(&png).unwrap().is_none());
    }
}

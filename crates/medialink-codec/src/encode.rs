//! Rendering document identifiers into scannable PNG images.

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::error::{CodecError, CodecResult};
use crate::payload::build_payload;

/// Minimum rendered image edge in pixels. Small enough to stay cheap,
/// large enough that phone cameras and the decoder resolve the modules.
const MIN_IMAGE_DIMENSION: u32 = 256;

/// A rendered code image together with the payload it encodes.
#[derive(Debug, Clone)]
pub struct EncodedCode {
    /// PNG image bytes.
    pub png: Vec<u8>,
    /// The exact payload string embedded in the image.
    pub payload: String,
}

/// Encode a document identifier into a scannable PNG.
///
/// Deterministic for identical inputs. Fails when `identifier` or
/// `base_url` is empty or the base URL is not absolute.
pub fn encode(identifier: &str, base_url: &str) -> CodecResult<EncodedCode> {
    if identifier.trim().is_empty() {
        return Err(CodecError::Encode("identifier is empty".to_string()));
    }
    if base_url.trim().is_empty() {
        return Err(CodecError::Encode("base URL is empty".to_string()));
    }

    let payload = build_payload(identifier, base_url)?;

    let code = QrCode::new(payload.as_bytes()).map_err(|e| CodecError::Encode(e.to_string()))?;
    let rendered = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_IMAGE_DIMENSION, MIN_IMAGE_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(rendered).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(EncodedCode { png, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_rejects_empty_identifier() {
        let err = encode("", "https://x/view").unwrap_err();
        assert!(err.to_string().contains("identifier is empty"));
        let err = encode("   ", "https://x/view").unwrap_err();
        assert!(err.to_string().contains("identifier is empty"));
    }

    #[test]
    fn encode_rejects_empty_base_url() {
        let err = encode("42", "").unwrap_err();
        assert!(err.to_string().contains("base URL is empty"));
    }

    #[test]
    fn encode_produces_png_with_payload() {
        let encoded = encode("42", "https://x/view").unwrap();
        assert_eq!(encoded.payload, "https://x/view?doc_id=42");
        // PNG signature
        assert_eq!(&encoded.png[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn encode_is_deterministic() {
        let a = encode("abc", "https://x/view").unwrap();
        let b = encode("abc", "https://x/view").unwrap();
        assert_eq!(a.png, b.png);
        assert_eq!(a.payload, b.payload);
    }

    #[test]
    fn encode_meets_minimum_dimensions() {
        let encoded = encode("42", "https://x/view").unwrap();
        let img = image::load_from_memory(&encoded.png).unwrap();
        assert!(img.width() >= MIN_IMAGE_DIMENSION);
        assert!(img.height() >= MIN_IMAGE_DIMENSION);
    }
}

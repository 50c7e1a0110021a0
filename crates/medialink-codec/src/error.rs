//! Error types for code encoding and decoding.

use thiserror::Error;

/// Codec operation errors.
///
/// A scanned image containing no code region is not an error; `decode`
/// reports that case as `Ok(None)`.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Payload construction or rendering failed.
    #[error("Encode failed: {0}")]
    Encode(String),

    /// The input bytes are not a readable raster image.
    #[error("Unreadable image: {0}")]
    Image(#[from] image::ImageError),

    /// A payload was read but does not name a document.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

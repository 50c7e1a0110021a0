//! # medialink-codec
//!
//! Scannable code encoding and decoding for medialink.
//!
//! A document identifier is embedded in a URL payload
//! (`base_url?doc_id=<identifier>`), rendered into a QR PNG, and later read
//! back from a scanned raster image. The three operations compose into the
//! round trip the rest of the system relies on:
//!
//! ```rust
//! use medialink_codec::{decode, encode, extract_identifier};
//!
//! let encoded = encode("d0c-1", "https://example.org/view").unwrap();
//! let payload = decode(&encoded.png).unwrap().expect("code present");
//! assert_eq!(extract_identifier(&payload).unwrap(), "d0c-1");
//! ```
//!
//! Decoding distinguishes misses from faults: an image with no detectable
//! code region yields `Ok(None)`, while bytes that are not a raster image at
//! all yield an error. Identifiers are plain strings here; the orchestrator
//! owns their interpretation.

pub mod decode;
pub mod encode;
pub mod error;
pub mod payload;

pub use decode::decode;
pub use encode::{encode, EncodedCode};
pub use error::{CodecError, CodecResult};
pub use payload::{build_payload, extract_identifier, DOC_ID_PARAM};

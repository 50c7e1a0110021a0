//! Code payload construction and parsing.
//!
//! A payload is the base URL with the document identifier attached as the
//! `doc_id` query parameter, e.g.
//! `http://localhost:8502/view_media?doc_id=5f0c…`.

use url::Url;

use crate::error::{CodecError, CodecResult};

/// Query parameter carrying the document identifier.
pub const DOC_ID_PARAM: &str = "doc_id";

/// Build the payload string for a document identifier.
///
/// The base URL must be absolute; existing query parameters are preserved
/// and `doc_id` is appended.
pub fn build_payload(identifier: &str, base_url: &str) -> CodecResult<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CodecError::Encode(format!("invalid base URL '{}': {}", base_url, e)))?;
    url.query_pairs_mut().append_pair(DOC_ID_PARAM, identifier);
    Ok(url.into())
}

/// Extract the document identifier from a decoded payload.
///
/// Fails with `InvalidPayload` when the payload is not a well-formed URL,
/// lacks the `doc_id` parameter, or carries it empty.
pub fn extract_identifier(payload: &str) -> CodecResult<String> {
    let url = Url::parse(payload)
        .map_err(|e| CodecError::InvalidPayload(format!("not a URL: {}", e)))?;

    let id = url
        .query_pairs()
        .find(|(key, _)| key == DOC_ID_PARAM)
        .map(|(_, value)| value.into_owned());

    match id {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(CodecError::InvalidPayload(format!(
            "empty {} parameter",
            DOC_ID_PARAM
        ))),
        None => Err(CodecError::InvalidPayload(format!(
            "missing {} parameter",
            DOC_ID_PARAM
        ))),
    }
}

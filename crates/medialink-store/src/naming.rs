//! Stored-name collision handling shared by both backends.

use chrono::Utc;
use medialink_core::{BlobKind, Error, MediaStore, Result};

/// Upper bound on candidate names tried before a put gives up.
pub(crate) const MAX_NAME_ATTEMPTS: u32 = 100;

/// Insert a uniqueness suffix before the final extension.
///
/// `clip.mp3` with suffix `1724` becomes `clip_1724.mp3`; names without an
/// extension get the suffix appended.
pub(crate) fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}_{suffix}.{ext}"),
        _ => format!("{name}_{suffix}"),
    }
}

/// Pick a stored name that does not collide with an existing blob.
///
/// The sanitized name is used as-is when free. On collision a UTC timestamp
/// suffix is tried, then timestamp plus counter. An existing blob is never
/// overwritten.
pub(crate) async fn unique_name<S>(store: &S, kind: BlobKind, sanitized: &str) -> Result<String>
where
    S: MediaStore + ?Sized,
{
    if !store.exists(&kind.locator(sanitized)).await? {
        return Ok(sanitized.to_string());
    }

    let stamp = Utc::now().timestamp();
    let mut candidate = with_suffix(sanitized, &stamp.to_string());
    for attempt in 1..MAX_NAME_ATTEMPTS {
        if !store.exists(&kind.locator(&candidate)).await? {
            return Ok(candidate);
        }
        candidate = with_suffix(sanitized, &format!("{stamp}_{attempt}"));
    }

    Err(Error::Storage(format!(
        "no unique stored name for {sanitized:?} after {MAX_NAME_ATTEMPTS} attempts"
    )))
}

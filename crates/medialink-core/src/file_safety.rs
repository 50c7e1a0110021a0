//! Upload validation and filename safety.
//!
//! Every rule here runs before the first storage write, so a rejected upload
//! leaves no partial state behind:
//! 1. Title and file presence
//! 2. Size limit
//! 3. Extension allowed for the declared media type
//! 4. Magic-byte content kind matches the declared media type

use thiserror::Error;

use crate::defaults::{ServiceConfig, FILENAME_MAX_LENGTH};
use crate::models::MediaType;

/// A broken upload-validation rule. Carries the offending values so callers
/// can surface exactly what to correct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("a file is required")]
    MissingFile,

    #[error("file '{0}' has no extension")]
    MissingExtension(String),

    #[error("extension '.{extension}' is not valid for {media_type} (allowed: {allowed})")]
    ExtensionNotAllowed {
        media_type: MediaType,
        extension: String,
        allowed: String,
    },

    #[error("file size {size} exceeds the limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("file content looks like {detected}, but the declared media type is {declared}")]
    ContentKindMismatch {
        declared: MediaType,
        detected: String,
    },
}

/// Validate an upload against the configured rules.
///
/// Checks run in the order presence → size → extension → content kind; the
/// first broken rule is returned. A file exactly at the size limit passes.
pub fn validate_upload(
    title: &str,
    file_name: &str,
    data: &[u8],
    media_type: MediaType,
    config: &ServiceConfig,
) -> std::result::Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if file_name.trim().is_empty() || data.is_empty() {
        return Err(ValidationError::MissingFile);
    }

    let size = data.len() as u64;
    if size > config.max_upload_size_bytes {
        return Err(ValidationError::TooLarge {
            size,
            limit: config.max_upload_size_bytes,
        });
    }

    let extension = match file_extension(file_name) {
        Some(ext) => ext,
        None => return Err(ValidationError::MissingExtension(file_name.to_string())),
    };

    if !config.extensions.contains(media_type, &extension) {
        return Err(ValidationError::ExtensionNotAllowed {
            media_type,
            extension,
            allowed: config.extensions.allowed(media_type).join(", "),
        });
    }

    // Magic bytes are authoritative for the binary formats accepted here.
    // Unrecognized content passes (a bare MPEG frame stream has no reliable
    // signature); a recognized kind that contradicts the declaration fails.
    if let Some((detected, mime)) = detect_media_kind(data) {
        if detected != media_type {
            return Err(ValidationError::ContentKindMismatch {
                declared: media_type,
                detected: mime.to_string(),
            });
        }
    }

    Ok(())
}

/// Lowercased final extension of a filename, if any.
pub fn file_extension(file_name: &str) -> Option<String> {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Detect the media kind claimed by the file's magic bytes.
///
/// Returns the matching [`MediaType`] and the detected MIME string, or `None`
/// for content that is not a recognizable image/video/audio format.
pub fn detect_media_kind(data: &[u8]) -> Option<(MediaType, &'static str)> {
    let kind = infer::get(data)?;
    let media_type = match kind.matcher_type() {
        infer::MatcherType::Image => MediaType::Image,
        infer::MatcherType::Video => MediaType::Video,
        infer::MatcherType::Audio => MediaType::Audio,
        _ => return None,
    };
    Some((media_type, kind.mime_type()))
}

/// Sanitize filename for safe storage.
///
/// Path components are stripped and everything outside `[A-Za-z0-9._-]`
/// becomes `_`. Names that sanitize to nothing usable (empty, or dots only,
/// which would escape the namespace directory) fall back to `unnamed_file`.
pub fn sanitize_filename(filename: &str) -> String {
    // Remove path components
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return "unnamed_file".to_string();
    }

    // Truncate if too long (preserve extension)
    if sanitized.len() > FILENAME_MAX_LENGTH {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            if ext.len() < FILENAME_MAX_LENGTH {
                let stem = &sanitized[..FILENAME_MAX_LENGTH - ext.len()];
                return format!("{}{}", stem, ext);
            }
        }
        return sanitized[..FILENAME_MAX_LENGTH].to_string();
    }

    sanitized
}

//! Core data models for medialink.
//!
//! These types are shared across all medialink crates and represent the
//! domain entities: documents, the blobs they own, and the outcome types
//! returned by lifecycle operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults;

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Kind of media a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            _ => Err(format!("Invalid media type: {}", s)),
        }
    }
}

/// A persisted media document row.
///
/// `qr_url` is null between the insert and attach phases of creation; every
/// other field is immutable after insert except `title` and `description`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDocument {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_url: String,
    pub media_type: MediaType,
    pub qr_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MediaDocument {
    /// True once the code reference has been attached.
    pub fn is_linked(&self) -> bool {
        self.qr_url.is_some()
    }
}

/// Fields for the first phase of document creation (no code reference yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub media_url: String,
    pub media_type: MediaType,
}

/// Partial update of a document; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocumentRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// BLOB STORE TYPES
// =============================================================================

/// Namespace a blob lives in. Media uploads and generated code images are
/// kept apart so either set can be listed or swept independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobKind {
    Media,
    Code,
}

impl BlobKind {
    /// Key prefix for this namespace.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Media => defaults::MEDIA_NAMESPACE,
            Self::Code => defaults::CODE_NAMESPACE,
        }
    }

    /// Locator for a stored name in this namespace. Locators are relative to
    /// the store root and mean the same thing in every backend.
    pub fn locator(&self, stored_name: &str) -> String {
        format!("{}/{}", self.prefix(), stored_name)
    }
}

impl std::fmt::Display for BlobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Media => write!(f, "media"),
            Self::Code => write!(f, "code"),
        }
    }
}

/// Result of a successful `put`: the name the blob was stored under (after
/// sanitization and collision suffixing) and the locator that retrieves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBlob {
    pub stored_name: String,
    pub locator: String,
}

/// Outcome of removing a single resource. Removing something that is already
/// gone is `Missing`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Missing,
}

impl Removal {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

// =============================================================================
// LIFECYCLE TYPES
// =============================================================================

/// Stage reached by the document-creation pipeline. Held in memory by the
/// orchestrator only; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStage {
    Validating,
    MediaStored,
    RecordInserted,
    CodeGenerated,
    CodeStored,
    Linked,
}

impl std::fmt::Display for CreateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::MediaStored => write!(f, "media_stored"),
            Self::RecordInserted => write!(f, "record_inserted"),
            Self::CodeGenerated => write!(f, "code_generated"),
            Self::CodeStored => write!(f, "code_stored"),
            Self::Linked => write!(f, "linked"),
        }
    }
}

/// Result of a completed create pipeline.
///
/// `code_png` carries the rendered image so the caller can present it
/// immediately without a second round-trip to the store.
#[derive(Debug, Clone)]
pub struct CreatedDocument {
    pub document_id: Uuid,
    pub code_locator: String,
    pub code_png: Vec<u8>,
}

/// Per-resource outcome of a best-effort delete.
///
/// A flag is `true` iff the resource existed and was removed by this call; a
/// resource that was already absent leaves its flag `false` without adding an
/// error. `errors` holds only real failures, so a retried delete of an
/// already-cleaned document reports all-false and no errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub record_deleted: bool,
    pub media_deleted: bool,
    pub code_deleted: bool,
    pub errors: Vec<String>,
}

impl DeleteOutcome {
    /// All three resources were present and removed.
    pub fn fully_deleted(&self) -> bool {
        self.record_deleted && self.media_deleted && self.code_deleted
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Outcome of resolving a scanned code image back to a document.
///
/// The three miss cases are routine user-driven outcomes, not faults, so they
/// ride the Ok channel; infrastructure failures use `Error`.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Code decoded and the identifier matched a document.
    Resolved(MediaDocument),
    /// No code region was detected in the image.
    NoCodeDetected,
    /// A code was read but its payload does not name a document.
    InvalidPayload(String),
    /// The payload named an identifier with no matching record.
    NotFound(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

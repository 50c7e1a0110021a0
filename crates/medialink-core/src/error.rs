//! Error types for medialink.

use crate::file_safety::ValidationError;
use crate::models::CreateStage;
use thiserror::Error;

/// Result type alias using medialink's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medialink operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Blob store operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// A persisted media_type column held an unknown value
    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    /// Code encoding or image decoding failed
    #[error("Codec error: {0}")]
    Codec(String),

    /// Upload rejected before any resource was created
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Create pipeline failed after compensation; names the stage reached
    #[error("Create failed at {stage}: {reason}")]
    CreateFailed { stage: CreateStage, reason: String },

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stage carried by a `CreateFailed` error, if this is one.
    pub fn create_stage(&self) -> Option<CreateStage> {
        match self {
            Error::CreateFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_storage() {
        let err = Error::Storage("bucket unreachable".to_string());
        assert_eq!(err.to_string(), "Storage error: bucket unreachable");
    }

    #[test]
    fn test_error_display_document_not_found() {
        let id = Uuid::nil();
        let err = Error::DocumentNotFound(id);
        assert_eq!(err.to_string(), format!("Document not found: {}", id));
    }

    #[test]
    fn test_error_display_invalid_media_type() {
        let err = Error::InvalidMediaType("hologram".to_string());
        assert_eq!(err.to_string(), "Invalid media type: hologram");
    }

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation(ValidationError::EmptyTitle);
        assert_eq!(err.to_string(), "Validation failed: title must not be empty");
    }

    #[test]
    fn test_error_display_codec() {
        let err = Error::Codec("Unreadable image: corrupt PNG".to_string());
        assert_eq!(err.to_string(), "Codec error: Unreadable image: corrupt PNG");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("missing base URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing base URL");
    }

    #[test]
    fn test_error_display_create_failed() {
        let err = Error::CreateFailed {
            stage: CreateStage::RecordInserted,
            reason: "code store unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Create failed at record_inserted: code store unavailable"
        );
    }

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_validation_error() {
        let err: Error = ValidationError::MissingFile.into();
        match err {
            Error::Validation(_) => {}
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_create_stage_accessor() {
        let err = Error::CreateFailed {
            stage: CreateStage::CodeStored,
            reason: "attach failed".to_string(),
        };
        assert_eq!(err.create_stage(), Some(CreateStage::CodeStored));
        assert_eq!(Error::Storage("x".to_string()).create_stage(), None);
    }

    #[test]
    fn test_document_not_found_with_random_uuid() {
        let id = Uuid::new_v4();
        let err = Error::DocumentNotFound(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        let result = get_result();
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Storage("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Storage"));
    }
}

//! Centralized default constants and runtime configuration for medialink.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers; operators override the runtime values through the
//! environment variables named alongside each entry.

use crate::models::MediaType;

// =============================================================================
// FILE SAFETY
// =============================================================================

/// Maximum file upload size in bytes (50 MB).
/// Configurable via `MEDIALINK_MAX_UPLOAD_SIZE_BYTES`.
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum filename length (ext4/NTFS compatible).
pub const FILENAME_MAX_LENGTH: usize = 255;

// =============================================================================
// MEDIA EXTENSIONS
// =============================================================================

/// Extensions accepted for `media_type = image`.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Extensions accepted for `media_type = video`.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// Extensions accepted for `media_type = audio`.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

// =============================================================================
// BLOB NAMESPACES
// =============================================================================

/// Key prefix for uploaded media blobs.
pub const MEDIA_NAMESPACE: &str = "media";

/// Key prefix for generated code images.
pub const CODE_NAMESPACE: &str = "assets/qrs";

// =============================================================================
// CODE PAYLOAD
// =============================================================================

/// Default base URL embedded in code payloads.
/// Configurable via `MEDIALINK_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8502/view_media";

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Environment variable overriding the upload size limit.
pub const ENV_MAX_UPLOAD_SIZE_BYTES: &str = "MEDIALINK_MAX_UPLOAD_SIZE_BYTES";

/// Environment variable overriding the payload base URL.
pub const ENV_BASE_URL: &str = "MEDIALINK_BASE_URL";

/// Environment variable holding the administrator username.
pub const ENV_ADMIN_USER: &str = "MEDIALINK_ADMIN_USER";

/// Environment variable holding the administrator password.
pub const ENV_ADMIN_PASS: &str = "MEDIALINK_ADMIN_PASS";

// =============================================================================
// RUNTIME CONFIGURATION
// =============================================================================

/// Allowed file extensions per declared media type.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    pub image: Vec<String>,
    pub video: Vec<String>,
    pub audio: Vec<String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        let owned = |exts: &[&str]| exts.iter().map(|e| e.to_string()).collect();
        Self {
            image: owned(IMAGE_EXTENSIONS),
            video: owned(VIDEO_EXTENSIONS),
            audio: owned(AUDIO_EXTENSIONS),
        }
    }
}

impl ExtensionTable {
    /// Extensions accepted for the given media type.
    pub fn allowed(&self, media_type: MediaType) -> &[String] {
        match media_type {
            MediaType::Image => &self.image,
            MediaType::Video => &self.video,
            MediaType::Audio => &self.audio,
        }
    }

    /// Whether `extension` (lowercase, no leading dot) is accepted for the
    /// given media type.
    pub fn contains(&self, media_type: MediaType, extension: &str) -> bool {
        self.allowed(media_type).iter().any(|e| e == extension)
    }
}

/// Administrator credential pair.
///
/// Carried in the configuration for the login collaborator outside this
/// core; nothing in the lifecycle pipeline reads it.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    /// Constant-shape equality check used by the login collaborator.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration consumed by the lifecycle orchestrator and the
/// validation layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upload size cap in bytes; files at the cap pass, one byte over fails.
    pub max_upload_size_bytes: u64,
    /// Base URL embedded in generated code payloads.
    pub base_url: String,
    /// Allowed extension table per media type.
    pub extensions: ExtensionTable,
    /// Administrator credentials, when both env vars are set.
    pub admin: Option<AdminCredentials>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: MAX_UPLOAD_SIZE_BYTES,
            base_url: DEFAULT_BASE_URL.to_string(),
            extensions: ExtensionTable::default(),
            admin: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables with fallback to
    /// defaults. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var(ENV_MAX_UPLOAD_SIZE_BYTES) {
            match val.parse::<u64>() {
                Ok(bytes) if bytes > 0 => config.max_upload_size_bytes = bytes,
                _ => {
                    tracing::warn!(value = %val, "Invalid MEDIALINK_MAX_UPLOAD_SIZE_BYTES, using default");
                }
            }
        }

        if let Ok(val) = std::env::var(ENV_BASE_URL) {
            if val.trim().is_empty() {
                tracing::warn!("Empty MEDIALINK_BASE_URL, using default");
            } else {
                config.base_url = val;
            }
        }

        if let (Ok(username), Ok(password)) = (
            std::env::var(ENV_ADMIN_USER),
            std::env::var(ENV_ADMIN_PASS),
        ) {
            config.admin = Some(AdminCredentials { username, password });
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_limit_is_fifty_megabytes() {
        const {
            assert!(MAX_UPLOAD_SIZE_BYTES == 50 * 1024 * 1024);
        }
    }

    #[test]
    fn extension_tables_are_disjoint() {
        let table = ExtensionTable::default();
        for ext in table.allowed(MediaType::Image) {
            assert!(!table.contains(MediaType::Video, ext));
            assert!(!table.contains(MediaType::Audio, ext));
        }
        assert!(table.contains(MediaType::Image, "png"));
        assert!(table.contains(MediaType::Image, "jpg"));
        assert!(table.contains(MediaType::Image, "jpeg"));
        assert!(table.contains(MediaType::Video, "mp4"));
        assert!(table.contains(MediaType::Audio, "mp3"));
    }

    #[test]
    fn extension_lookup_is_exact() {
        let table = ExtensionTable::default();
        assert!(!table.contains(MediaType::Image, "PNG"));
        assert!(!table.contains(MediaType::Image, ".png"));
        assert!(!table.contains(MediaType::Audio, "mp"));
    }

    #[test]
    fn service_config_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_upload_size_bytes, MAX_UPLOAD_SIZE_BYTES);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.admin.is_none());
    }

    #[test]
    fn admin_credentials_match() {
        let creds = AdminCredentials {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
        };
        assert!(creds.matches("admin", "s3cret"));
        assert!(!creds.matches("admin", "wrong"));
        assert!(!creds.matches("root", "s3cret"));
    }

    #[test]
    fn admin_credentials_debug_redacts_password() {
        let creds = AdminCredentials {
            username: "admin".to_string(),
            password: "s3cret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn namespaces_are_distinct() {
        const {
            assert!(!MEDIA_NAMESPACE.is_empty());
            assert!(!CODE_NAMESPACE.is_empty());
        }
        assert_ne!(MEDIA_NAMESPACE, CODE_NAMESPACE);
    }
}

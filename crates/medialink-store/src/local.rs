//! Local filesystem blob storage.
//!
//! Blobs live under a base directory, one subdirectory per namespace
//! (`media/`, `assets/qrs/`). Writes are atomic: data goes to a `.tmp`
//! sibling, is fsynced, then renamed into place, so readers never observe a
//! partial blob. Deleting the last blob in a namespace removes the now-empty
//! directory.

use async_trait::async_trait;
use medialink_core::{sanitize_filename, BlobKind, MediaStore, Removal, Result, StoredBlob};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::naming;

/// Blob storage rooted at a base directory.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Create a store rooted at the given directory. The directory does not
    /// need to exist yet; namespaces are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, locator: &str) -> PathBuf {
        self.root.join(locator)
    }

    async fn write_atomic(&self, full_path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "media_store: create_dir_all failed");
                e
            })?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "media_store: File::create failed");
            e
        })?;
        file.write_all(data).await.map_err(|e| {
            warn!(error = %e, "media_store: write_all failed");
            e
        })?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "media_store: rename failed");
            e
        })?;

        // Set permissions to 0644 (rw-r--r--, no execute)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    /// Remove namespace directories left empty after a delete, walking up
    /// from `from` but never past the store root.
    async fn prune_empty_dirs(&self, from: &Path) {
        let mut dir = from.to_path_buf();
        while dir.starts_with(&self.root) && dir != self.root {
            // remove_dir refuses non-empty directories, which ends the walk.
            if fs::remove_dir(&dir).await.is_err() {
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => break,
            }
        }
    }

    /// Validate that the store can write, probe, and delete blobs.
    ///
    /// Round-trips a probe blob through put/exists/delete at startup to catch
    /// filesystem issues (overlayfs quirks, permission errors, read-only
    /// mounts) early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let probe = self
            .put(BlobKind::Media, "storage-probe.bin", b"media-store-probe")
            .await
            .map_err(|e| format!("put: {e}"))?;

        match self.exists(&probe.locator).await {
            Ok(true) => {}
            Ok(false) => return Err(format!("probe {} missing after put", probe.locator)),
            Err(e) => return Err(format!("exists: {e}")),
        }

        self.delete(&probe.locator)
            .await
            .map_err(|e| format!("delete: {e}"))?;

        Ok(())
    }
}

#[async_trait]
impl MediaStore for FilesystemStore {
    async fn put(&self, kind: BlobKind, logical_name: &str, bytes: &[u8]) -> Result<StoredBlob> {
        let sanitized = sanitize_filename(logical_name);
        let stored_name = naming::unique_name(self, kind, &sanitized).await?;
        let locator = kind.locator(&stored_name);

        self.write_atomic(&self.full_path(&locator), bytes).await?;
        debug!(locator = %locator, size = bytes.len(), "media_store: write");

        Ok(StoredBlob {
            stored_name,
            locator,
        })
    }

    async fn delete(&self, locator: &str) -> Result<Removal> {
        let full_path = self.full_path(locator);
        if !fs::try_exists(&full_path).await? {
            warn!(locator = %locator, "media_store: delete of missing blob");
            return Ok(Removal::Missing);
        }

        fs::remove_file(&full_path).await?;
        if let Some(parent) = full_path.parent() {
            self.prune_empty_dirs(parent).await;
        }
        debug!(locator = %locator, "media_store: delete");
        Ok(Removal::Removed)
    }

    async fn exists(&self, locator: &str) -> Result<bool> {
        Ok(fs::try_exists(self.full_path(locator)).await?)
    }

    async fn list_names(&self, kind: BlobKind) -> Result<Vec<String>> {
        let dir = self.root.join(kind.prefix());
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // In-flight temp files are not stored blobs.
            if name.ends_with(".tmp") {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn public_url(&self, locator: &str) -> String {
        self.full_path(locator).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FilesystemStore) {
        let dir = TempDir::new().unwrap();
        let store = FilesystemStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn put_stores_under_namespace() {
        let (dir, store) = store();

        let blob = store
            .put(BlobKind::Media, "clip.mp3", b"audio")
            .await
            .unwrap();

        assert_eq!(blob.stored_name, "clip.mp3");
        assert_eq!(blob.locator, "media/clip.mp3");
        let on_disk = std::fs::read(dir.path().join("media/clip.mp3")).unwrap();
        assert_eq!(on_disk, b"audio");
    }

    #[tokio::test]
    async fn put_sanitizes_logical_names() {
        let (_dir, store) = store();

        let blob = store
            .put(BlobKind::Media, "my clip?.mp3", b"x")
            .await
            .unwrap();

        assert_eq!(blob.stored_name, "my_clip_.mp3");
        assert_eq!(blob.locator, "media/my_clip_.mp3");
    }

    #[tokio::test]
    async fn put_suffixes_on_collision() {
        let (_dir, store) = store();

        let first = store.put(BlobKind::Media, "clip.mp3", b"one").await.unwrap();
        let second = store.put(BlobKind::Media, "clip.mp3", b"two").await.unwrap();

        assert_ne!(first.stored_name, second.stored_name);
        assert!(second.stored_name.starts_with("clip_"));
        assert!(second.stored_name.ends_with(".mp3"));
        assert!(store.exists(&first.locator).await.unwrap());
        assert!(store.exists(&second.locator).await.unwrap());
    }

    #[tokio::test]
    async fn collision_never_overwrites_first_blob() {
        let (dir, store) = store();

        store.put(BlobKind::Media, "clip.mp3", b"one").await.unwrap();
        store.put(BlobKind::Media, "clip.mp3", b"two").await.unwrap();

        let on_disk = std::fs::read(dir.path().join("media/clip.mp3")).unwrap();
        assert_eq!(on_disk, b"one");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = store();

        let blob = store.put(BlobKind::Media, "clip.mp3", b"x").await.unwrap();

        assert_eq!(store.delete(&blob.locator).await.unwrap(), Removal::Removed);
        assert_eq!(store.delete(&blob.locator).await.unwrap(), Removal::Missing);
    }

    #[tokio::test]
    async fn delete_prunes_empty_namespace_dirs() {
        let (dir, store) = store();

        let blob = store.put(BlobKind::Code, "d.png", b"png").await.unwrap();
        store.delete(&blob.locator).await.unwrap();

        assert!(!dir.path().join("assets/qrs").exists());
        assert!(!dir.path().join("assets").exists());
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn delete_keeps_nonempty_namespace_dir() {
        let (dir, store) = store();

        let a = store.put(BlobKind::Media, "a.mp3", b"a").await.unwrap();
        store.put(BlobKind::Media, "b.mp3", b"b").await.unwrap();
        store.delete(&a.locator).await.unwrap();

        assert!(dir.path().join("media").exists());
        assert_eq!(
            store.list_names(BlobKind::Media).await.unwrap(),
            vec!["b.mp3"]
        );
    }

    #[tokio::test]
    async fn exists_reflects_disk_state() {
        let (_dir, store) = store();

        assert!(!store.exists("media/clip.mp3").await.unwrap());
        store.put(BlobKind::Media, "clip.mp3", b"x").await.unwrap();
        assert!(store.exists("media/clip.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn list_names_is_sorted_and_skips_temp_files() {
        let (dir, store) = store();

        store.put(BlobKind::Media, "b.mp3", b"b").await.unwrap();
        store.put(BlobKind::Media, "a.mp3", b"a").await.unwrap();
        std::fs::write(dir.path().join("media/c.tmp"), b"partial").unwrap();

        assert_eq!(
            store.list_names(BlobKind::Media).await.unwrap(),
            vec!["a.mp3", "b.mp3"]
        );
    }

    #[tokio::test]
    async fn list_names_for_missing_namespace_is_empty() {
        let (_dir, store) = store();

        assert!(store.list_names(BlobKind::Code).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let (_dir, store) = store();

        store.put(BlobKind::Media, "clip.mp3", b"m").await.unwrap();
        store.put(BlobKind::Code, "d.png", b"c").await.unwrap();

        assert_eq!(
            store.list_names(BlobKind::Media).await.unwrap(),
            vec!["clip.mp3"]
        );
        assert_eq!(
            store.list_names(BlobKind::Code).await.unwrap(),
            vec!["d.png"]
        );
    }

    #[tokio::test]
    async fn validate_round_trips_probe() {
        let (_dir, store) = store();

        store.validate().await.unwrap();
        assert!(store.list_names(BlobKind::Media).await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stored_blobs_are_not_executable() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = store();
        store.put(BlobKind::Media, "clip.mp3", b"x").await.unwrap();

        let meta = std::fs::metadata(dir.path().join("media/clip.mp3")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o644);
    }

    #[tokio::test]
    async fn public_url_is_rooted_path() {
        let (dir, store) = store();

        let url = store.public_url("media/clip.mp3");
        assert!(url.starts_with(&dir.path().display().to_string()));
        assert!(url.ends_with("media/clip.mp3"));
    }
}

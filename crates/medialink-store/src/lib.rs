//! Blob storage backends for medialink.
//!
//! Two interchangeable implementations of
//! [`MediaStore`](medialink_core::MediaStore):
//!
//! - [`FilesystemStore`]: blobs under a local base directory, atomic writes
//! - [`BucketStore`]: S3-compatible object storage, path-style requests
//!
//! Callers hold an `Arc<dyn MediaStore>` and never branch on which backend
//! is active. Locators are namespace-relative (`media/<name>`,
//! `assets/qrs/<name>`) and mean the same thing in both backends, so records
//! that embed a locator survive a change of backing medium.
//!
//! ## Example
//!
//! ```rust,no_run
//! use medialink_core::{BlobKind, MediaStore};
//! use medialink_store::FilesystemStore;
//!
//! # async fn run() -> medialink_core::Result<()> {
//! let store = FilesystemStore::new("/var/medialink/blobs");
//! let blob = store.put(BlobKind::Media, "clip.mp3", b"...").await?;
//! assert_eq!(blob.locator, "media/clip.mp3");
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod local;

mod naming;

pub use bucket::{BucketConfig, BucketStore};
pub use local::FilesystemStore;

//! Core traits for medialink abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability: the document
//! repository (PostgreSQL in production) and the media store (local
//! filesystem or remote bucket). Callers hold trait objects and never branch
//! on which backend is active.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// DOCUMENT REPOSITORY
// =============================================================================

/// Repository for document CRUD operations.
///
/// The single source of truth for the three-way link between a record, its
/// media blob, and its code blob. All operations are round-trips to the
/// persistent store; nothing is cached.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document without a code reference (phase one of create).
    async fn insert(&self, doc: NewDocument) -> Result<MediaDocument>;

    /// Attach the code locator to an existing document (phase two of create).
    async fn attach_code(&self, id: Uuid, code_locator: &str) -> Result<()>;

    /// Partial update of title/description; `None` fields are unchanged.
    async fn update(&self, req: UpdateDocumentRequest) -> Result<MediaDocument>;

    /// Fetch a document by ID. Errs with `DocumentNotFound` on a miss.
    async fn get(&self, id: Uuid) -> Result<MediaDocument>;

    /// List all documents, newest first (id as tie-break, so the order is
    /// stable across calls).
    async fn list(&self) -> Result<Vec<MediaDocument>>;

    /// Delete a document row. `Missing` when no row existed.
    async fn delete(&self, id: Uuid) -> Result<Removal>;
}

// =============================================================================
// MEDIA STORE
// =============================================================================

/// Blob storage over two namespaces (uploaded media, generated code images).
///
/// Locators are namespace-relative keys (`media/<name>`,
/// `assets/qrs/<name>`) with identical shape across backends, so persisted
/// records survive a backend swap.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes under a sanitized form of `logical_name` within the
    /// namespace. Name collisions get a uniqueness suffix; existing blobs
    /// are never overwritten.
    async fn put(&self, kind: BlobKind, logical_name: &str, bytes: &[u8]) -> Result<StoredBlob>;

    /// Remove a blob. Removing an absent locator is `Missing`, not an error.
    async fn delete(&self, locator: &str) -> Result<Removal>;

    /// Whether a blob exists under this locator.
    async fn exists(&self, locator: &str) -> Result<bool>;

    /// Stored names currently present in the namespace.
    async fn list_names(&self, kind: BlobKind) -> Result<Vec<String>>;

    /// Caller-presentable URL or path for a locator.
    fn public_url(&self, locator: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Traits must stay object-safe: the orchestrator holds Arc<dyn ...>.
    #[test]
    fn repository_trait_is_object_safe() {
        fn _takes(_: &dyn DocumentRepository) {}
    }

    #[test]
    fn media_store_trait_is_object_safe() {
        fn _takes(_: &dyn MediaStore) {}
    }
}

//! Document lifecycle orchestration.
//!
//! `DocumentService` sequences the flows that tie a document's three linked
//! resources together: the database record, the media blob, and the generated
//! code image. This service handles:
//! - Staged creation with compensating actions on failure
//! - Partial updates of title and description
//! - Best-effort, per-resource deletion
//! - Resolving a scanned code image back to its document

use std::sync::Arc;
use std::time::Instant;

use medialink_codec::{decode, encode, extract_identifier};
use medialink_core::{
    validate_upload, BlobKind, CreateStage, CreatedDocument, DeleteOutcome, DocumentRepository,
    Error, MediaDocument, MediaStore, MediaType, NewDocument, Removal, Resolution, Result,
    ServiceConfig, UpdateDocumentRequest,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Inputs for creating a document together with its media upload.
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub file_name: String,
    pub file_bytes: Vec<u8>,
}

/// Orchestrates document lifecycle operations across the repository and the
/// media store. Methods take `&self`; clones share the same collaborators.
#[derive(Clone)]
pub struct DocumentService {
    repo: Arc<dyn DocumentRepository>,
    store: Arc<dyn MediaStore>,
    config: ServiceConfig,
}

impl DocumentService {
    /// Create a new document service over its collaborators.
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        store: Arc<dyn MediaStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            store,
            config,
        }
    }

    /// Create a document: store the media blob, insert the record, then
    /// encode, store, and attach its code image.
    ///
    /// Validation runs before the first write, so a rejected upload leaves
    /// nothing behind. After the record is inserted, the code tail is retried
    /// once on failure; if the retry also fails, the record and the media
    /// blob are removed again and the error names the stage reached.
    pub async fn create_document(&self, req: CreateDocumentRequest) -> Result<CreatedDocument> {
        let start = Instant::now();

        validate_upload(
            &req.title,
            &req.file_name,
            &req.file_bytes,
            req.media_type,
            &self.config,
        )?;
        debug!(
            component = "service",
            op = "create",
            stage = %CreateStage::Validating,
            size_bytes = req.file_bytes.len(),
            "upload accepted"
        );

        let media = match self
            .store
            .put(BlobKind::Media, &req.file_name, &req.file_bytes)
            .await
        {
            Ok(blob) => blob,
            // Nothing was created yet, so there is nothing to unwind.
            Err(e) => {
                return Err(Error::CreateFailed {
                    stage: CreateStage::Validating,
                    reason: e.to_string(),
                })
            }
        };
        debug!(
            component = "service",
            op = "create",
            stage = %CreateStage::MediaStored,
            locator = %media.locator,
            "media blob stored"
        );

        let record = match self
            .repo
            .insert(NewDocument {
                title: req.title,
                description: req.description,
                media_url: media.locator.clone(),
                media_type: req.media_type,
            })
            .await
        {
            Ok(record) => record,
            Err(e) => {
                self.remove_blob_best_effort(&media.locator).await;
                return Err(Error::CreateFailed {
                    stage: CreateStage::MediaStored,
                    reason: e.to_string(),
                });
            }
        };
        debug!(
            component = "service",
            op = "create",
            stage = %CreateStage::RecordInserted,
            document_id = %record.id,
            "record inserted"
        );

        let (code_locator, code_png) = match self.run_code_tail(record.id).await {
            Ok(tail) => tail,
            Err((stage, reason)) => {
                warn!(
                    component = "service",
                    op = "create",
                    document_id = %record.id,
                    stage = %stage,
                    error = %reason,
                    "code tail failed, retrying once"
                );
                match self.run_code_tail(record.id).await {
                    Ok(tail) => tail,
                    Err((stage, reason)) => {
                        self.unwind_create(record.id, &media.locator).await;
                        return Err(Error::CreateFailed { stage, reason });
                    }
                }
            }
        };

        info!(
            component = "service",
            op = "create",
            document_id = %record.id,
            stage = %CreateStage::Linked,
            locator = %code_locator,
            duration_ms = start.elapsed().as_millis() as u64,
            "document created"
        );

        Ok(CreatedDocument {
            document_id: record.id,
            code_locator,
            code_png,
        })
    }

    /// Fetch a single document by identifier.
    pub async fn get_document(&self, id: Uuid) -> Result<MediaDocument> {
        self.repo.get(id).await
    }

    /// All documents, newest first.
    pub async fn list_documents(&self) -> Result<Vec<MediaDocument>> {
        self.repo.list().await
    }

    /// Update a document's title and/or description. Fields left `None`
    /// keep their current values.
    pub async fn update_document(&self, req: UpdateDocumentRequest) -> Result<MediaDocument> {
        let updated = self.repo.update(req).await?;
        info!(
            component = "service",
            op = "update",
            document_id = %updated.id,
            "document updated"
        );
        Ok(updated)
    }

    /// Delete a document's record, media blob, and code image, best effort.
    ///
    /// Each sub-deletion is attempted regardless of the others' outcomes. A
    /// flag in the outcome is true iff that resource existed and was removed
    /// by this call; a resource that was already gone is logged, not failed,
    /// so a repeated delete reports all-false with no errors.
    pub async fn delete_document(&self, id: Uuid) -> DeleteOutcome {
        let mut outcome = DeleteOutcome::default();

        // The record carries both locators; read it before removing anything.
        let doc = match self.repo.get(id).await {
            Ok(doc) => doc,
            Err(Error::DocumentNotFound(_)) => {
                warn!(
                    component = "service",
                    op = "delete",
                    document_id = %id,
                    "delete of unknown document"
                );
                return outcome;
            }
            Err(e) => {
                outcome.errors.push(format!("lookup: {}", e));
                return outcome;
            }
        };

        match self.repo.delete(id).await {
            Ok(Removal::Removed) => outcome.record_deleted = true,
            Ok(Removal::Missing) => {
                warn!(
                    component = "service",
                    op = "delete",
                    document_id = %id,
                    "record already missing"
                );
            }
            Err(e) => outcome.errors.push(format!("record: {}", e)),
        }

        outcome.media_deleted = self
            .delete_blob_for(id, &doc.media_url, "media blob", &mut outcome.errors)
            .await;

        if let Some(code_locator) = &doc.qr_url {
            outcome.code_deleted = self
                .delete_blob_for(id, code_locator, "code blob", &mut outcome.errors)
                .await;
        }

        info!(
            component = "service",
            op = "delete",
            document_id = %id,
            record = outcome.record_deleted,
            media = outcome.media_deleted,
            code = outcome.code_deleted,
            success = outcome.errors.is_empty(),
            "delete finished"
        );
        outcome
    }

    /// Resolve a scanned code image back to the document it references.
    ///
    /// The three miss cases ride the Ok channel as [`Resolution`] variants;
    /// only unreadable image bytes and repository faults are errors. An image
    /// with no code never touches the repository.
    pub async fn resolve_from_code_image(&self, image_bytes: &[u8]) -> Result<Resolution> {
        let payload = match decode(image_bytes) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(component = "service", op = "resolve", "no code detected in image");
                return Ok(Resolution::NoCodeDetected);
            }
            Err(e) => return Err(Error::Codec(e.to_string())),
        };

        let identifier = match extract_identifier(&payload) {
            Ok(identifier) => identifier,
            Err(e) => {
                debug!(
                    component = "service",
                    op = "resolve",
                    error = %e,
                    "payload does not name a document"
                );
                return Ok(Resolution::InvalidPayload(payload));
            }
        };

        let document_id = match Uuid::parse_str(&identifier) {
            Ok(id) => id,
            Err(_) => {
                debug!(
                    component = "service",
                    op = "resolve",
                    "decoded identifier is not a document identifier"
                );
                return Ok(Resolution::InvalidPayload(payload));
            }
        };

        match self.repo.get(document_id).await {
            Ok(doc) => {
                info!(
                    component = "service",
                    op = "resolve",
                    document_id = %doc.id,
                    "code resolved"
                );
                Ok(Resolution::Resolved(doc))
            }
            Err(Error::DocumentNotFound(_)) => {
                debug!(
                    component = "service",
                    op = "resolve",
                    document_id = %document_id,
                    "no record for decoded identifier"
                );
                Ok(Resolution::NotFound(identifier))
            }
            Err(e) => Err(e),
        }
    }

    /// One attempt at the create tail: encode the payload, store the code
    /// image, attach its locator to the record. On failure the stored code
    /// blob, if any, is removed so a retry starts clean; the error carries
    /// the last stage completed.
    async fn run_code_tail(
        &self,
        document_id: Uuid,
    ) -> std::result::Result<(String, Vec<u8>), (CreateStage, String)> {
        let identifier = document_id.to_string();
        let encoded = encode(&identifier, &self.config.base_url)
            .map_err(|e| (CreateStage::RecordInserted, e.to_string()))?;
        debug!(
            component = "service",
            op = "create",
            stage = %CreateStage::CodeGenerated,
            document_id = %document_id,
            "code image generated"
        );

        let blob = self
            .store
            .put(BlobKind::Code, &format!("{}.png", identifier), &encoded.png)
            .await
            .map_err(|e| (CreateStage::CodeGenerated, e.to_string()))?;
        debug!(
            component = "service",
            op = "create",
            stage = %CreateStage::CodeStored,
            document_id = %document_id,
            locator = %blob.locator,
            "code image stored"
        );

        if let Err(e) = self.repo.attach_code(document_id, &blob.locator).await {
            self.remove_blob_best_effort(&blob.locator).await;
            return Err((CreateStage::CodeStored, e.to_string()));
        }

        Ok((blob.locator, encoded.png))
    }

    /// Undo a create that failed after the record was inserted: remove the
    /// record and the media blob. Failures here are logged and swallowed;
    /// the pipeline error is what the caller reports.
    async fn unwind_create(&self, document_id: Uuid, media_locator: &str) {
        if let Err(e) = self.repo.delete(document_id).await {
            warn!(
                component = "service",
                op = "create",
                document_id = %document_id,
                error = %e,
                "compensation failed to remove record"
            );
        }
        self.remove_blob_best_effort(media_locator).await;
    }

    /// Remove a blob while a failed create is unwinding, keeping the
    /// original pipeline error as the one reported.
    async fn remove_blob_best_effort(&self, locator: &str) {
        match self.store.delete(locator).await {
            Ok(Removal::Removed) => {
                debug!(
                    component = "service",
                    op = "create",
                    locator = %locator,
                    "compensation removed blob"
                );
            }
            Ok(Removal::Missing) => {
                warn!(
                    component = "service",
                    op = "create",
                    locator = %locator,
                    "compensation found blob already missing"
                );
            }
            Err(e) => {
                warn!(
                    component = "service",
                    op = "create",
                    locator = %locator,
                    error = %e,
                    "compensation failed to remove blob"
                );
            }
        }
    }

    /// Delete one blob for the delete flow. Returns whether the blob existed
    /// and was removed; a failure is recorded in `errors`.
    async fn delete_blob_for(
        &self,
        id: Uuid,
        locator: &str,
        label: &str,
        errors: &mut Vec<String>,
    ) -> bool {
        match self.store.delete(locator).await {
            Ok(Removal::Removed) => true,
            Ok(Removal::Missing) => {
                warn!(
                    component = "service",
                    op = "delete",
                    document_id = %id,
                    locator = %locator,
                    "{} already missing",
                    label
                );
                false
            }
            Err(e) => {
                errors.push(format!("{}: {}", label, e));
                false
            }
        }
    }
}

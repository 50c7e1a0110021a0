//! Mock repository and store collaborators for deterministic testing.
//!
//! Both mocks implement the core traits over in-memory maps and record every
//! call, so tests can assert not only outcomes but which collaborator calls a
//! pipeline made (and did not make). Failure injection is deterministic: a
//! flag fails a method on every call, and the store's put countdown fails the
//! next N puts into one namespace and then recovers, which is how
//! transient-fault retry behavior is exercised.
//!
//! ## Usage
//!
//! ```rust
//! use medialink_core::{BlobKind, MediaStore};
//! use medialink_service::mock::MockMediaStore;
//!
//! #[tokio::test]
//! async fn put_records_calls() {
//!     let store = MockMediaStore::new();
//!     store.put(BlobKind::Media, "a.mp3", b"bytes").await.unwrap();
//!     assert_eq!(store.put_call_count(BlobKind::Media), 1);
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use medialink_core::{
    sanitize_filename, BlobKind, DocumentRepository, Error, MediaDocument, MediaStore,
    NewDocument, Removal, Result, StoredBlob, UpdateDocumentRequest,
};
use uuid::Uuid;

/// One recorded collaborator call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

// ─── Repository ─────────────────────────────────────────────────────────────

/// Mock document repository backed by an in-memory map.
#[derive(Clone)]
pub struct MockDocumentRepository {
    config: Arc<RepoFailures>,
    documents: Arc<Mutex<HashMap<Uuid, MediaDocument>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone, Default)]
struct RepoFailures {
    fail_inserts: bool,
    fail_attach: bool,
    fail_deletes: bool,
}

impl MockDocumentRepository {
    /// Create an empty mock repository.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RepoFailures::default()),
            documents: Arc::new(Mutex::new(HashMap::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every `insert` call.
    pub fn with_failing_inserts(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_inserts = true;
        self
    }

    /// Fail every `attach_code` call.
    pub fn with_failing_attach(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_attach = true;
        self
    }

    /// Fail every `delete` call.
    pub fn with_failing_deletes(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_deletes = true;
        self
    }

    /// Number of documents currently held.
    pub fn document_count(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Number of calls logged for one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn simulated_outage() -> Error {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "simulated database failure",
        ))
    }
}

impl Default for MockDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for MockDocumentRepository {
    async fn insert(&self, doc: NewDocument) -> Result<MediaDocument> {
        self.log_call("insert", &doc.title);
        if self.config.fail_inserts {
            return Err(Self::simulated_outage());
        }

        let record = MediaDocument {
            id: Uuid::new_v4(),
            title: doc.title,
            description: doc.description,
            media_url: doc.media_url,
            media_type: doc.media_type,
            qr_url: None,
            created_at: Utc::now(),
        };
        self.documents
            .lock()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn attach_code(&self, id: Uuid, code_locator: &str) -> Result<()> {
        self.log_call("attach_code", &format!("{} {}", id, code_locator));
        if self.config.fail_attach {
            return Err(Self::simulated_outage());
        }

        let mut documents = self.documents.lock().unwrap();
        let record = documents.get_mut(&id).ok_or(Error::DocumentNotFound(id))?;
        record.qr_url = Some(code_locator.to_string());
        Ok(())
    }

    async fn update(&self, req: UpdateDocumentRequest) -> Result<MediaDocument> {
        self.log_call("update", &req.id.to_string());

        let mut documents = self.documents.lock().unwrap();
        let record = documents
            .get_mut(&req.id)
            .ok_or(Error::DocumentNotFound(req.id))?;
        if let Some(title) = req.title {
            record.title = title;
        }
        if let Some(description) = req.description {
            record.description = Some(description);
        }
        Ok(record.clone())
    }

    async fn get(&self, id: Uuid) -> Result<MediaDocument> {
        self.log_call("get", &id.to_string());
        self.documents
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::DocumentNotFound(id))
    }

    async fn list(&self) -> Result<Vec<MediaDocument>> {
        self.log_call("list", "");
        let mut documents: Vec<MediaDocument> =
            self.documents.lock().unwrap().values().cloned().collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(documents)
    }

    async fn delete(&self, id: Uuid) -> Result<Removal> {
        self.log_call("delete", &id.to_string());
        if self.config.fail_deletes {
            return Err(Self::simulated_outage());
        }

        match self.documents.lock().unwrap().remove(&id) {
            Some(_) => Ok(Removal::Removed),
            None => Ok(Removal::Missing),
        }
    }
}

// ─── Media store ────────────────────────────────────────────────────────────

/// Mock media store backed by an in-memory map keyed by locator.
#[derive(Clone)]
pub struct MockMediaStore {
    config: Arc<StoreFailures>,
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    put_failures_left: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Default)]
struct StoreFailures {
    fail_put_kind: Option<BlobKind>,
    fail_deletes: bool,
    latency_ms: u64,
}

impl MockMediaStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self {
            config: Arc::new(StoreFailures::default()),
            blobs: Arc::new(Mutex::new(HashMap::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
            put_failures_left: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail the next `count` puts into `kind`, then recover.
    pub fn with_failing_puts(mut self, kind: BlobKind, count: usize) -> Self {
        Arc::make_mut(&mut self.config).fail_put_kind = Some(kind);
        self.put_failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every `delete` call.
    pub fn with_failing_deletes(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_deletes = true;
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Blob bytes stored under `locator`, if any.
    pub fn blob(&self, locator: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(locator).cloned()
    }

    /// Number of blobs currently held across all namespaces.
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Number of calls logged for one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Number of `put` calls aimed at one namespace.
    pub fn put_call_count(&self, kind: BlobKind) -> usize {
        let prefix = format!("{}/", kind.prefix());
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == "put" && c.input.starts_with(&prefix))
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn take_put_failure(&self) -> bool {
        self.put_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn put(&self, kind: BlobKind, logical_name: &str, bytes: &[u8]) -> Result<StoredBlob> {
        self.log_call("put", &kind.locator(logical_name));
        self.simulate_latency().await;

        if self.config.fail_put_kind == Some(kind) && self.take_put_failure() {
            return Err(Error::Storage("simulated put failure".to_string()));
        }

        let mut blobs = self.blobs.lock().unwrap();
        let stored_name = unique_name(&blobs, kind, logical_name);
        let locator = kind.locator(&stored_name);
        blobs.insert(locator.clone(), bytes.to_vec());
        Ok(StoredBlob {
            stored_name,
            locator,
        })
    }

    async fn delete(&self, locator: &str) -> Result<Removal> {
        self.log_call("delete", locator);
        self.simulate_latency().await;

        if self.config.fail_deletes {
            return Err(Error::Storage("simulated delete failure".to_string()));
        }

        match self.blobs.lock().unwrap().remove(locator) {
            Some(_) => Ok(Removal::Removed),
            None => Ok(Removal::Missing),
        }
    }

    async fn exists(&self, locator: &str) -> Result<bool> {
        self.log_call("exists", locator);
        Ok(self.blobs.lock().unwrap().contains_key(locator))
    }

    async fn list_names(&self, kind: BlobKind) -> Result<Vec<String>> {
        self.log_call("list", kind.prefix());
        let prefix = format!("{}/", kind.prefix());
        let mut names: Vec<String> = self
            .blobs
            .lock()
            .unwrap()
            .keys()
            .filter_map(|locator| locator.strip_prefix(&prefix))
            .map(|name| name.to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn public_url(&self, locator: &str) -> String {
        format!("mock://{}", locator)
    }
}

/// First free stored name for a logical name, suffixing `_1`, `_2`, … before
/// the extension on collision.
fn unique_name(blobs: &HashMap<String, Vec<u8>>, kind: BlobKind, logical_name: &str) -> String {
    let sanitized = sanitize_filename(logical_name);
    if !blobs.contains_key(&kind.locator(&sanitized)) {
        return sanitized;
    }

    let (stem, ext) = match sanitized.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{}", ext)),
        _ => (sanitized.clone(), String::new()),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{}_{}{}", stem, n, ext);
        if !blobs.contains_key(&kind.locator(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}

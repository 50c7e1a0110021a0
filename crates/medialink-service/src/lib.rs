//! # medialink-service
//!
//! Document lifecycle orchestration for medialink.
//!
//! [`DocumentService`] coordinates the repository and the media store so
//! that a document's record, media blob, and code image stay linked:
//! creation is a staged pipeline with compensating actions, deletion is
//! best-effort per resource, and a scanned code image resolves back to the
//! document it references. The [`mock`] module provides in-memory
//! collaborators for tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use medialink_service::mock::{MockDocumentRepository, MockMediaStore};
//! use medialink_service::{
//!     CreateDocumentRequest, DocumentService, MediaType, ServiceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = DocumentService::new(
//!         Arc::new(MockDocumentRepository::new()),
//!         Arc::new(MockMediaStore::new()),
//!         ServiceConfig::default(),
//!     );
//!
//!     let created = service
//!         .create_document(CreateDocumentRequest {
//!             title: "Field Interview".to_string(),
//!             description: None,
//!             media_type: MediaType::Audio,
//!             file_name: "a.mp3".to_string(),
//!             file_bytes: std::fs::read("a.mp3").unwrap(),
//!         })
//!         .await
//!         .unwrap();
//!     println!("code stored at {}", created.code_locator);
//! }
//! ```

pub mod mock;
pub mod service;

// Re-export core so consumers get the full vocabulary from one crate
pub use medialink_core::*;

pub use service::{CreateDocumentRequest, DocumentService};

//! # medialink-core
//!
//! Core types, traits, and abstractions for the medialink library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other medialink crates depend on: the document model, the repository
//! and media-store seams, upload validation, and shared configuration.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use defaults::{AdminCredentials, ExtensionTable, ServiceConfig};
pub use error::{Error, Result};
pub use file_safety::{sanitize_filename, validate_upload, ValidationError};
pub use models::*;
pub use traits::*;

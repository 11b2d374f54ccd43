//! Domain models and types for the exporter.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CollectionName`], [`DocumentId`])
//! - **Documents and export files** ([`Document`], [`ExportFile`])
//! - **Error types** ([`ExporterError`], [`FirestoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use firestore_export::domain::{CollectionName, Document, ExportFile};
//! use serde_json::json;
//!
//! # fn example() -> firestore_export::domain::Result<()> {
//! let collection = CollectionName::new("profiles")?;
//! let docs = vec![Document::new("u1", json!({"name": "Ann"}))?];
//! let file = ExportFile::from_documents(&collection, docs)?;
//! assert_eq!(file.len(), 1);
//! assert_eq!(collection.file_name(), "profiles.json");
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{Document, ExportFile};
pub use errors::{ExporterError, FirestoreError};
pub use ids::{CollectionName, DocumentId};
pub use result::Result;

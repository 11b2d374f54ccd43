//! External system integrations.
//!
//! - [`source`] - Document source abstraction (trait-based)
//! - [`firestore`] - Firestore REST implementation
//!
//! The export pipeline only sees [`source::DocumentSource`], so tests swap in
//! in-memory sources and the Firestore client stays isolated here.
//!
//! ```rust,no_run
//! use firestore_export::adapters::source::create_document_source;
//! use firestore_export::config::{AuthType, FirestoreConfig};
//!
//! # fn example() -> firestore_export::domain::Result<()> {
//! let config = FirestoreConfig {
//!     project_id: "my-project".to_string(),
//!     auth_type: AuthType::Metadata,
//!     ..FirestoreConfig::default()
//! };
//!
//! let source = create_document_source(&config)?;
//! println!("Reading from {}", source.name());
//! # Ok(())
//! # }
//! ```

pub mod firestore;
pub mod source;

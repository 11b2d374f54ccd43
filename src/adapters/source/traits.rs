//! Document source abstraction
//!
//! The exporter only needs one capability from the database: read every
//! document of a named collection. Keeping it behind a trait lets the export
//! procedure run against Firestore in production and an in-memory source in
//! tests.

use crate::domain::{CollectionName, Document, Result};
use async_trait::async_trait;

/// A database the exporter can read collections from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short human-readable name of the backend, used in log lines
    fn name(&self) -> &str;

    /// Checks that the database is reachable and accepts our credentials
    ///
    /// `sample` is a collection the check may read (at most one document).
    ///
    /// # Errors
    ///
    /// Returns a connection or authentication error if the check fails.
    async fn test_connection(&self, sample: &CollectionName) -> Result<()>;

    /// Fetches every document of `collection`
    ///
    /// The returned documents form one snapshot of the collection. Order is
    /// not meaningful.
    ///
    /// # Errors
    ///
    /// Returns an error on network, authentication or decoding failure. No
    /// retry is attempted.
    async fn fetch_all_documents(&self, collection: &CollectionName) -> Result<Vec<Document>>;
}

//! Document source factory
//!
//! Creates the document source the exporter reads from, based on configuration.

use crate::adapters::firestore::FirestoreClient;
use crate::adapters::source::traits::DocumentSource;
use crate::config::FirestoreConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create a document source for the configured Firestore database
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the credentials
/// configuration is incomplete.
pub fn create_document_source(config: &FirestoreConfig) -> Result<Arc<dyn DocumentSource>> {
    tracing::info!(
        project_id = %config.project_id,
        database_id = %config.database_id,
        base_url = %config.base_url,
        auth_type = %config.auth_type,
        "Creating Firestore client"
    );
    let client = FirestoreClient::new(config)?;

    Ok(Arc::new(client) as Arc<dyn DocumentSource>)
}

//! Firestore REST client
//!
//! Reads whole collections through `documents:runQuery`. A single runQuery
//! call returns every document of the collection read at one consistent read
//! time, so each fetch is a snapshot and no pagination is involved.

use super::auth::TokenProvider;
use super::models::{ErrorResponse, FirestoreDocument, RunQueryRequest, RunQueryResponseItem};
use crate::adapters::source::DocumentSource;
use crate::config::FirestoreConfig;
use crate::domain::{CollectionName, Document, ExporterError, FirestoreError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Firestore client backed by the REST API
///
/// # Example
///
/// ```no_run
/// use firestore_export::adapters::firestore::FirestoreClient;
/// use firestore_export::adapters::source::DocumentSource;
/// use firestore_export::config::{AuthType, FirestoreConfig};
/// use firestore_export::domain::CollectionName;
///
/// # async fn example() -> firestore_export::domain::Result<()> {
/// let config = FirestoreConfig {
///     project_id: "demo-project".to_string(),
///     base_url: "http://localhost:8080/v1".to_string(),
///     auth_type: AuthType::Anonymous,
///     ..FirestoreConfig::default()
/// };
///
/// let client = FirestoreClient::new(&config)?;
/// let docs = client
///     .fetch_all_documents(&CollectionName::new("profiles")?)
///     .await?;
/// println!("{} documents", docs.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FirestoreClient {
    /// HTTP client for making requests
    http: Client,

    /// `.../projects/{p}/databases/{d}/documents`
    documents_url: String,

    /// Bearer token source
    auth: TokenProvider,
}

impl FirestoreClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or bearer auth is
    /// selected without a token.
    pub fn new(config: &FirestoreConfig) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for Firestore requests");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let http = client_builder.build().map_err(|e| {
            ExporterError::Connection(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            documents_url: config.documents_url(),
            auth: TokenProvider::from_config(config)?,
        })
    }

    /// URL of the database's `documents` resource
    pub fn documents_url(&self) -> &str {
        &self.documents_url
    }

    /// Runs a structured query and returns the matching documents
    async fn run_query(&self, request: &RunQueryRequest) -> Result<Vec<FirestoreDocument>> {
        let url = format!("{}:runQuery", self.documents_url);

        let mut builder = self.http.post(&url).json(request);
        if let Some(token) = self.auth.token(&self.http).await? {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FirestoreError::Timeout(e.to_string())
            } else {
                FirestoreError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body).into());
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FirestoreError::Timeout(e.to_string())
            } else {
                FirestoreError::ConnectionFailed(e.to_string())
            }
        })?;

        let items: Vec<RunQueryResponseItem> = serde_json::from_slice(&body)?;

        let mut documents = Vec::with_capacity(items.len());
        for item in items {
            if let Some(error) = item.error {
                return Err(FirestoreError::QueryFailed {
                    status: status.as_u16(),
                    message: format!("code {}: {}", error.code, error.message),
                }
                .into());
            }
            if let Some(document) = item.document {
                documents.push(document);
            }
        }

        Ok(documents)
    }
}

/// Maps a non-success HTTP status to a Firestore error
fn status_error(status: StatusCode, body: &str) -> FirestoreError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FirestoreError::AuthenticationFailed(format!("{status}: {message}"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            FirestoreError::Timeout(format!("{status}: {message}"))
        }
        _ => FirestoreError::QueryFailed {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl DocumentSource for FirestoreClient {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn test_connection(&self, sample: &CollectionName) -> Result<()> {
        tracing::debug!(collection = %sample, "Testing Firestore connection");
        let request = RunQueryRequest::for_collection(sample.as_str()).with_limit(1);
        self.run_query(&request).await?;
        Ok(())
    }

    async fn fetch_all_documents(&self, collection: &CollectionName) -> Result<Vec<Document>> {
        let request = RunQueryRequest::for_collection(collection.as_str());
        let raw = self.run_query(&request).await?;

        tracing::debug!(
            collection = %collection,
            count = raw.len(),
            "Fetched collection snapshot"
        );

        raw.into_iter()
            .map(FirestoreDocument::into_document)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            FirestoreError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            FirestoreError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            status_error(StatusCode::GATEWAY_TIMEOUT, ""),
            FirestoreError::Timeout(_)
        ));

        match status_error(StatusCode::NOT_FOUND, "plain text") {
            FirestoreError::QueryFailed { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "plain text");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_uses_google_error_message() {
        let body = r#"{"error":{"code":404,"message":"The database (default) does not exist","status":"NOT_FOUND"}}"#;
        match status_error(StatusCode::NOT_FOUND, body) {
            FirestoreError::QueryFailed { message, .. } => {
                assert_eq!(message, "The database (default) does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! Domain error types
//!
//! This module defines the error hierarchy for the exporter.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main exporter error type
///
/// This is the primary error type used throughout the application.
/// Every failure aborts the run, so the variants exist to give the operator
/// enough context and to pick the process exit code.
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Firestore-related errors
    #[error("Firestore error: {0}")]
    Firestore(#[from] FirestoreError),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Failure while fetching a specific collection
    #[error("Failed to fetch collection \"{collection}\": {source}")]
    Fetch {
        collection: String,
        #[source]
        source: Box<ExporterError>,
    },

    /// Document data that cannot be represented as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem failure writing an export file
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Verification could not be carried out
    #[error("Verification error: {0}")]
    Verification(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ExporterError {
    /// Wraps this error as a fetch failure of the given collection
    pub fn in_collection(self, collection: impl Into<String>) -> Self {
        match self {
            already @ ExporterError::Fetch { .. } => already,
            other => ExporterError::Fetch {
                collection: collection.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns true when the root cause is an unreachable or refusing database
    pub fn is_connection_failure(&self) -> bool {
        match self {
            ExporterError::Connection(_) | ExporterError::Authentication(_) => true,
            ExporterError::Firestore(e) => matches!(
                e,
                FirestoreError::ConnectionFailed(_)
                    | FirestoreError::AuthenticationFailed(_)
                    | FirestoreError::Timeout(_)
            ),
            ExporterError::Fetch { source, .. } => source.is_connection_failure(),
            _ => false,
        }
    }

    /// Process exit code for this error
    ///
    /// * `2` - configuration error
    /// * `4` - connection or authentication failure
    /// * `5` - any other fatal export failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ExporterError::Configuration(_) | ExporterError::Validation(_) => 2,
            e if e.is_connection_failure() => 4,
            _ => 5,
        }
    }
}

/// Firestore-specific errors
///
/// Errors that occur when talking to the Firestore REST API.
/// These errors don't expose HTTP client types.
#[derive(Debug, Error)]
pub enum FirestoreError {
    /// Failed to reach the Firestore endpoint
    #[error("Failed to connect to Firestore: {0}")]
    ConnectionFailed(String),

    /// Credentials missing or rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The query was rejected or failed server-side
    #[error("Query failed: {status} - {message}")]
    QueryFailed { status: u16, message: String },

    /// The server answered with something that is not a runQuery response
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ExporterError {
    fn from(err: std::io::Error) -> Self {
        ExporterError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExporterError {
    fn from(err: serde_json::Error) -> Self {
        ExporterError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ExporterError {
    fn from(err: toml::de::Error) -> Self {
        ExporterError::Configuration(format!("TOML parse error: {err}"))
    }
}

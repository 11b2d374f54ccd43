//! Result type alias for the exporter

use super::errors::ExporterError;

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use firestore_export::domain::result::Result;
/// use firestore_export::domain::errors::ExporterError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ExporterError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExporterError>;

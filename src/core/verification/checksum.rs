//! SHA-256 checksums of export files

use crate::domain::{ExporterError, Result};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Calculate SHA-256 checksum of raw bytes
///
/// Returns a hex-encoded checksum string (64 characters).
///
/// ```
/// use firestore_export::core::verification::checksum::calculate_checksum_bytes;
///
/// let checksum = calculate_checksum_bytes(b"{}");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Reads a file and returns its contents together with their checksum
pub async fn read_with_checksum(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ExporterError::Verification(format!("Failed to read {}: {e}", path.display()))
    })?;
    let checksum = calculate_checksum_bytes(&bytes);
    Ok((bytes, checksum))
}

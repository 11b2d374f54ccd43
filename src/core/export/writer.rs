//! Export file writer
//!
//! Each collection is written to `<output_dir>/<collection>.json`. The JSON is
//! first written to `<collection>.json.tmp` next to the target and then renamed
//! over it, so a failure never leaves a half-written export file behind.

use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::domain::{CollectionName, ExportFile, ExporterError, Result};
use std::path::{Path, PathBuf};

/// A file produced by the writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Final path of the export file
    pub path: PathBuf,

    /// Size in bytes
    pub bytes: u64,

    /// Hex-encoded SHA-256 of the file contents
    pub checksum: String,
}

/// Writes export files into an output directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl ExportWriter {
    /// Create a writer for the given output directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory of this writer
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the export file of `collection` is written to
    pub fn path_for(&self, collection: &CollectionName) -> PathBuf {
        self.output_dir.join(collection.file_name())
    }

    /// Serializes `file` and writes it as the export of `collection`,
    /// replacing any existing file
    ///
    /// # Errors
    ///
    /// Returns [`ExporterError::Serialization`] if the mapping cannot be
    /// serialized and [`ExporterError::Write`] on any filesystem failure.
    pub async fn write_collection(
        &self,
        collection: &CollectionName,
        file: &ExportFile,
    ) -> Result<WrittenFile> {
        let json = file.to_pretty_json()?;
        let path = self.path_for(collection);
        let tmp_path = self
            .output_dir
            .join(format!("{}.tmp", collection.file_name()));

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| write_error(&self.output_dir, e))?;

        if let Err(e) = tokio::fs::write(&tmp_path, json.as_bytes()).await {
            remove_tmp(&tmp_path).await;
            return Err(write_error(&path, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            remove_tmp(&tmp_path).await;
            return Err(write_error(&path, e));
        }

        tracing::debug!(
            collection = %collection,
            path = %path.display(),
            bytes = json.len(),
            "Wrote export file"
        );

        Ok(WrittenFile {
            path,
            bytes: json.len() as u64,
            checksum: calculate_checksum_bytes(json.as_bytes()),
        })
    }
}

fn write_error(path: &Path, error: std::io::Error) -> ExporterError {
    ExporterError::Write {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

async fn remove_tmp(tmp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(tmp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %tmp_path.display(),
                error = %e,
                "Failed to remove temporary export file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;
    use serde_json::json;

    fn profiles() -> (CollectionName, ExportFile) {
        let name = CollectionName::new("profiles").unwrap();
        let docs = vec![
            Document::new("u1", json!({"name": "Ann"})).unwrap(),
            Document::new("u2", json!({"name": "Bo"})).unwrap(),
        ];
        let file = ExportFile::from_documents(&name, docs).unwrap();
        (name, file)
    }

    #[tokio::test]
    async fn test_write_collection() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path());
        let (name, file) = profiles();

        let written = writer.write_collection(&name, &file).await.unwrap();

        assert_eq!(written.path, dir.path().join("profiles.json"));
        let content = std::fs::read_to_string(&written.path).unwrap();
        assert_eq!(written.bytes, content.len() as u64);
        assert_eq!(written.checksum, calculate_checksum_bytes(content.as_bytes()));
        assert!(!dir.path().join("profiles.json.tmp").exists());

        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, json!({"u1": {"name": "Ann"}, "u2": {"name": "Bo"}}));
    }

    #[tokio::test]
    async fn test_write_collection_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("profiles.json"), "stale content").unwrap();

        let writer = ExportWriter::new(dir.path());
        let (name, file) = profiles();
        writer.write_collection(&name, &file).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("profiles.json")).unwrap();
        assert!(!content.contains("stale"));
    }

    #[tokio::test]
    async fn test_write_collection_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("backups").join("today");
        let writer = ExportWriter::new(&nested);
        let (name, file) = profiles();

        let written = writer.write_collection(&name, &file).await.unwrap();
        assert!(written.path.starts_with(&nested));
        assert!(written.path.exists());
    }

    #[tokio::test]
    async fn test_write_collection_failure_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let writer = ExportWriter::new(&blocker);
        let (name, file) = profiles();

        let err = writer.write_collection(&name, &file).await.unwrap_err();
        assert!(matches!(err, ExporterError::Write { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path makes the rename fail
        std::fs::create_dir(dir.path().join("profiles.json")).unwrap();
        std::fs::write(dir.path().join("profiles.json").join("keep"), "x").unwrap();

        let writer = ExportWriter::new(dir.path());
        let (name, file) = profiles();

        let err = writer.write_collection(&name, &file).await.unwrap_err();
        assert!(matches!(err, ExporterError::Write { .. }));
        assert!(!dir.path().join("profiles.json.tmp").exists());
    }
}

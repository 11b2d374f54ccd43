//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::export::writer::WrittenFile;
use crate::core::verification::report::VerificationReport;
use crate::domain::CollectionName;
use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// Result of exporting one collection
#[derive(Debug, Clone)]
pub struct CollectionExport {
    /// Exported collection
    pub collection: CollectionName,

    /// Number of documents in the snapshot
    pub document_count: usize,

    /// Ids of the exported documents, sorted
    pub document_ids: Vec<String>,

    /// Written file, `None` in dry-run mode
    pub output: Option<WrittenFile>,
}

impl CollectionExport {
    /// Progress line reported once the collection is done
    ///
    /// ```
    /// use firestore_export::core::export::CollectionExport;
    /// use firestore_export::domain::CollectionName;
    ///
    /// let export = CollectionExport {
    ///     collection: CollectionName::new("profiles").unwrap(),
    ///     document_count: 2,
    ///     document_ids: vec!["u1".into(), "u2".into()],
    ///     output: None,
    /// };
    /// assert_eq!(export.progress_line(), r#"Exported 2 docs from "profiles" to profiles.json"#);
    /// ```
    pub fn progress_line(&self) -> String {
        format!(
            "Exported {} docs from \"{}\" to {}",
            self.document_count,
            self.collection,
            self.collection.file_name()
        )
    }
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Identifier of this run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Exported collections, in export order
    pub collections: Vec<CollectionExport>,

    /// Total number of exported documents
    pub total_documents: usize,

    /// Duration of the export
    pub duration: Duration,

    /// Whether files were written
    pub dry_run: bool,

    /// Verification report (if verification was run)
    pub verification_report: Option<VerificationReport>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            collections: Vec::new(),
            total_documents: 0,
            duration: Duration::from_secs(0),
            dry_run,
            verification_report: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record an exported collection
    pub fn add_collection(&mut self, export: CollectionExport) {
        self.total_documents += export.document_count;
        self.collections.push(export);
    }

    /// Set the verification report
    pub fn set_verification_report(&mut self, report: VerificationReport) {
        self.verification_report = Some(report);
    }

    /// Written files, in export order
    pub fn written_files(&self) -> impl Iterator<Item = &WrittenFile> {
        self.collections.iter().filter_map(|c| c.output.as_ref())
    }

    /// Total bytes written
    pub fn total_bytes(&self) -> u64 {
        self.written_files().map(|f| f.bytes).sum()
    }

    /// Check if the run passed verification (true when none was run)
    pub fn is_successful(&self) -> bool {
        self.verification_report
            .as_ref()
            .map_or(true, VerificationReport::is_success)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            collections = self.collections.len(),
            total_documents = self.total_documents,
            total_bytes = self.total_bytes(),
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Export summary"
        );

        for export in &self.collections {
            tracing::debug!(
                collection = %export.collection,
                count = export.document_count,
                path = ?export.output.as_ref().map(|o| o.path.display().to_string()),
                checksum = ?export.output.as_ref().map(|o| o.checksum.as_str()),
                "Collection summary"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn export(name: &str, count: usize, bytes: Option<u64>) -> CollectionExport {
        CollectionExport {
            collection: CollectionName::new(name).unwrap(),
            document_count: count,
            document_ids: (0..count).map(|i| format!("d{i}")).collect(),
            output: bytes.map(|bytes| WrittenFile {
                path: PathBuf::from(format!("{name}.json")),
                bytes,
                checksum: "00".repeat(32),
            }),
        }
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(false);

        assert!(summary.collections.is_empty());
        assert_eq!(summary.total_documents, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(!summary.dry_run);
        assert!(summary.verification_report.is_none());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(ExportSummary::new(false).run_id, ExportSummary::new(false).run_id);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(false).with_duration(Duration::from_secs(120));
        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_add_collection_totals() {
        let mut summary = ExportSummary::new(false);
        summary.add_collection(export("profiles", 2, Some(60)));
        summary.add_collection(export("companies", 3, Some(40)));

        assert_eq!(summary.total_documents, 5);
        assert_eq!(summary.total_bytes(), 100);
        assert_eq!(summary.written_files().count(), 2);
    }

    #[test]
    fn test_dry_run_has_no_written_files() {
        let mut summary = ExportSummary::new(true);
        summary.add_collection(export("profiles", 2, None));

        assert_eq!(summary.total_documents, 2);
        assert_eq!(summary.written_files().count(), 0);
        assert_eq!(summary.total_bytes(), 0);
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(
            export("applied_jobs", 0, None).progress_line(),
            "Exported 0 docs from \"applied_jobs\" to applied_jobs.json"
        );
    }

    #[test]
    fn test_is_successful_follows_verification() {
        let mut summary = ExportSummary::new(false);
        let mut report = VerificationReport::new();
        report.record_pass();
        summary.set_verification_report(report.clone());
        assert!(summary.is_successful());

        report.record_failure(crate::core::verification::VerificationFailure {
            collection: "profiles".to_string(),
            path: "profiles.json".to_string(),
            expected_checksum: "a".to_string(),
            actual_checksum: "b".to_string(),
            reason: "Checksum mismatch".to_string(),
        });
        summary.set_verification_report(report);
        assert!(!summary.is_successful());
    }
}

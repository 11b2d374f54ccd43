//! Verification logic for post-export validation
//!
//! Every written export file is read back, its checksum compared with the one
//! recorded at write time, and its key set compared with the ids fetched from
//! the source.

use crate::core::export::summary::{CollectionExport, ExportSummary};
use crate::core::export::writer::WrittenFile;
use crate::core::verification::checksum::read_with_checksum;
use crate::core::verification::report::{VerificationFailure, VerificationReport};
use crate::domain::Result;
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

/// Verifier for post-export validation
#[derive(Debug, Default)]
pub struct Verifier;

impl Verifier {
    /// Create a new verifier
    pub fn new() -> Self {
        Self
    }

    /// Verify the files of an export run
    ///
    /// Collections without a written file (dry run) are not counted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use firestore_export::core::export::ExportSummary;
    /// use firestore_export::core::verification::Verifier;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let summary = ExportSummary::new(false);
    /// let report = Verifier::new().verify_export(&summary).await?;
    /// println!("{}", report.format_summary());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn verify_export(&self, summary: &ExportSummary) -> Result<VerificationReport> {
        let start = Instant::now();
        let mut report = VerificationReport::new();

        tracing::info!(
            collections = summary.collections.len(),
            "Starting post-export verification"
        );

        for export in &summary.collections {
            let Some(written) = &export.output else {
                continue;
            };
            match self.verify_collection(export, written).await {
                Ok(()) => report.record_pass(),
                Err(failure) => {
                    tracing::warn!(
                        collection = %failure.collection,
                        path = %failure.path,
                        reason = %failure.reason,
                        "Verification failure"
                    );
                    report.record_failure(failure);
                }
            }
        }

        report.set_duration(start.elapsed().as_millis() as u64);

        tracing::info!(
            passed = report.passed,
            failed = report.failed,
            total = report.total_verified,
            duration_ms = report.duration_ms,
            "Verification completed"
        );

        Ok(report)
    }

    async fn verify_collection(
        &self,
        export: &CollectionExport,
        written: &WrittenFile,
    ) -> std::result::Result<(), VerificationFailure> {
        let failure = |actual_checksum: String, reason: String| VerificationFailure {
            collection: export.collection.to_string(),
            path: written.path.display().to_string(),
            expected_checksum: written.checksum.clone(),
            actual_checksum,
            reason,
        };

        let (bytes, actual) = read_with_checksum(&written.path)
            .await
            .map_err(|e| failure(String::new(), e.to_string()))?;

        if actual != written.checksum {
            return Err(failure(actual, "Checksum mismatch".to_string()));
        }

        let parsed: Value = serde_json::from_slice(&bytes)
            .map_err(|e| failure(actual.clone(), format!("Invalid JSON: {e}")))?;

        let Value::Object(map) = parsed else {
            return Err(failure(actual, "Top-level value is not an object".to_string()));
        };

        let on_disk: BTreeSet<&str> = map.keys().map(String::as_str).collect();
        let fetched: BTreeSet<&str> = export.document_ids.iter().map(String::as_str).collect();
        if on_disk != fetched {
            let missing = fetched.difference(&on_disk).count();
            let unexpected = on_disk.difference(&fetched).count();
            return Err(failure(
                actual,
                format!("Key set differs: {missing} missing, {unexpected} unexpected"),
            ));
        }

        Ok(())
    }
}

//! Export coordinator - main orchestrator for the export process
//!
//! Collections are processed strictly one after another: fetch, build the
//! mapping, write, report. The first error aborts the run.

use crate::adapters::source::{create_document_source, DocumentSource};
use crate::config::ExporterConfig;
use crate::core::export::summary::{CollectionExport, ExportSummary};
use crate::core::export::writer::ExportWriter;
use crate::core::verification::Verifier;
use crate::domain::{CollectionName, ExportFile, Result};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    collections: Vec<CollectionName>,
    source: Arc<dyn DocumentSource>,
    writer: ExportWriter,
    dry_run: bool,
    verify: bool,
}

impl ExportCoordinator {
    /// Create a coordinator reading from `source`
    ///
    /// # Errors
    ///
    /// Returns a validation error if a configured collection name is invalid.
    pub fn new(config: &ExporterConfig, source: Arc<dyn DocumentSource>) -> Result<Self> {
        Ok(Self {
            collections: config.export.collection_names()?,
            source,
            writer: ExportWriter::new(&config.export.output_dir),
            dry_run: config.export.dry_run,
            verify: config.verification.enable_verification,
        })
    }

    /// Create a coordinator reading from the configured Firestore database
    pub fn from_config(config: &ExporterConfig) -> Result<Self> {
        let source = create_document_source(&config.firestore)?;
        Self::new(config, source)
    }

    /// Collections exported by this coordinator, in order
    pub fn collections(&self) -> &[CollectionName] {
        &self.collections
    }

    /// Execute the export
    ///
    /// For each collection in order:
    /// 1. Fetch a snapshot of all its documents
    /// 2. Build the id → data mapping
    /// 3. Write `<collection>.json` (skipped in dry-run mode)
    /// 4. Log the progress line
    ///
    /// Then runs verification if enabled and logs completion.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new(self.dry_run);

        tracing::info!(
            run_id = %summary.run_id,
            source = self.source.name(),
            collections = self.collections.len(),
            output_dir = %self.writer.output_dir().display(),
            dry_run = self.dry_run,
            "Starting export"
        );

        for collection in &self.collections {
            let export = self.export_collection(collection).await?;
            crate::log_collection_exported!(export);
            summary.add_collection(export);
        }

        if self.verify {
            if self.dry_run {
                tracing::info!("Dry run, skipping verification");
            } else {
                let report = Verifier::new().verify_export(&summary).await?;
                if !report.is_success() {
                    tracing::warn!(
                        failed = report.failed,
                        "Verification found {} export file(s) that do not match what was written",
                        report.failed
                    );
                }
                summary.set_verification_report(report);
            }
        }

        tracing::info!("Export complete!");

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    async fn export_collection(&self, collection: &CollectionName) -> Result<CollectionExport> {
        crate::log_collection_start!(collection);

        let documents = self
            .source
            .fetch_all_documents(collection)
            .await
            .map_err(|e| e.in_collection(collection.as_str()))?;

        let file = ExportFile::from_documents(collection, documents)?;

        let output = if self.dry_run {
            tracing::info!(
                collection = %collection,
                count = file.len(),
                "Dry run, not writing {}",
                self.writer.path_for(collection).display()
            );
            None
        } else {
            Some(self.writer.write_collection(collection, &file).await?)
        };

        Ok(CollectionExport {
            collection: collection.clone(),
            document_count: file.len(),
            document_ids: file.ids().map(str::to_string).collect(),
            output,
        })
    }
}

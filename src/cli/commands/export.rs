//! Export command implementation
//!
//! This module implements the `export` command, which writes every configured
//! collection to `<collection>.json`.

use crate::config::loader::split_list;
use crate::config::{read_config, ExporterConfig};
use crate::core::export::{ExportCoordinator, ExportSummary};
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the collections to export (comma-separated, in order)
    #[arg(long, value_name = "NAMES")]
    pub collections: Option<String>,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Dry run mode - fetch and count documents without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Applies command-line overrides to a loaded configuration
    pub fn apply_overrides(&self, config: &mut ExporterConfig) {
        if let Some(collections) = &self.collections {
            let names = split_list(collections);
            tracing::info!(collections = ?names, "Overriding collections from CLI");
            config.export.collections = names;
        }

        if let Some(output_dir) = &self.output_dir {
            tracing::info!(output_dir = %output_dir, "Overriding output directory from CLI");
            config.export.output_dir = output_dir.clone();
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting export command");

        let mut config = match read_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            crate::log_error_with_context!(e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.export.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        let coordinator = match ExportCoordinator::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(e, "Export failed");
                eprintln!("❌ Export failed: {e}");
                return Ok(e.exit_code());
            }
        };

        print_summary(&summary);

        let exit_code = if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed but verification failed");
            1
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &ExportSummary) {
    println!("{}", render_summary(summary));
}

fn render_summary(summary: &ExportSummary) -> String {
    let mut out = String::from("\n📊 Export Summary:\n");
    out.push_str(&format!("  Run ID: {}\n", summary.run_id));
    for export in &summary.collections {
        match &export.output {
            Some(file) => out.push_str(&format!(
                "  {}: {} docs -> {} ({} bytes)\n",
                export.collection,
                export.document_count,
                file.path.display(),
                file.bytes
            )),
            None => out.push_str(&format!(
                "  {}: {} docs (not written)\n",
                export.collection, export.document_count
            )),
        }
    }
    out.push_str(&format!("  Total Documents: {}\n", summary.total_documents));
    out.push_str(&format!("  Duration: {:.2}s\n", summary.duration.as_secs_f64()));

    if let Some(report) = &summary.verification_report {
        out.push('\n');
        out.push_str(&report.format_summary());
    }

    out
}

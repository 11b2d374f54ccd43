//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the exporter configuration file.

use crate::adapters::source::create_document_source;
use crate::config::{load_config, ExporterConfig};
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also issue a test query against Firestore
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                crate::log_error_with_context!(e, "Configuration is invalid");
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        print_config_summary(&config);

        if self.check_connection {
            println!("🔌 Checking connection to Firestore...");
            match check_connection(&config).await {
                Ok(()) => println!("✅ Connection successful"),
                Err(e) => {
                    crate::log_error_with_context!(e, "Connection check failed");
                    println!("❌ Connection check failed");
                    println!("   Error: {e}");
                    return Ok(e.exit_code());
                }
            }
            println!();
        }

        Ok(0)
    }
}

async fn check_connection(config: &ExporterConfig) -> Result<()> {
    let source = create_document_source(&config.firestore)?;
    let collections = config.export.collection_names()?;
    // validation guarantees at least one collection
    if let Some(sample) = collections.first() {
        source.test_connection(sample).await?;
    }
    Ok(())
}

fn print_config_summary(config: &ExporterConfig) {
    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Project: {}", config.firestore.project_id);
    println!("  Database: {}", config.firestore.database_id);
    println!("  Endpoint: {}", config.firestore.base_url);
    println!("  Auth: {}", config.firestore.auth_type);
    println!("  Collections: {}", config.export.collections.join(", "));
    println!("  Output Directory: {}", config.export.output_dir);
    println!("  Dry Run: {}", config.export.dry_run);
    println!(
        "  Verification: {}",
        if config.verification.enable_verification {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs::default()
            .execute("/nonexistent/firestore-export.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_invalid_collection_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[firestore]
project_id = "demo"
auth_type = "none"

[export]
collections = ["profiles", "a/b"]
"#
        )
        .unwrap();

        let code = ValidateArgs::default()
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}

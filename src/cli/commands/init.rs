//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "firestore-export.toml")]
    pub output: String,

    /// Include all options with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing firestore-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set project_id and the collections to export in {}", self.output);
                println!("  2. Provide an access token, e.g. in a .env file:");
                println!("     FSEXPORT_FIRESTORE_ACCESS_TOKEN=$(gcloud auth print-access-token)");
                println!("     or set auth_type = \"metadata\" when running on Google Cloud,");
                println!("     or set FIRESTORE_EMULATOR_HOST to export from the emulator");
                println!("  3. Validate configuration: firestore-export validate-config --check-connection");
                println!("  4. Run export: firestore-export export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# firestore-export configuration

[application]
log_level = "info"

[firestore]
project_id = "my-project"
auth_type = "bearer"  # bearer | metadata | emulator | none
# Token for bearer auth, or set FSEXPORT_FIRESTORE_ACCESS_TOKEN instead
# access_token = "${FSEXPORT_ACCESS_TOKEN}"

[export]
collections = ["applied_jobs", "companies", "company_portfolios", "profiles"]
output_dir = "."

[verification]
enable_verification = false

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with every option and its explanation
    fn generate_config_with_examples() -> String {
        r#"# firestore-export configuration
#
# Exports whole Firestore collections to <collection>.json files.
# Values of the form ${VAR} are read from the environment, and any setting can
# be overridden with FSEXPORT_<SECTION>_<KEY> (e.g. FSEXPORT_EXPORT_OUTPUT_DIR).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Firestore Connection
# ============================================================================
[firestore]
# Google Cloud project id (GOOGLE_CLOUD_PROJECT is used when empty)
project_id = "my-project"

# Firestore database id
database_id = "(default)"

# REST endpoint; FIRESTORE_EMULATOR_HOST switches this to the emulator
base_url = "https://firestore.googleapis.com/v1"

# Authentication type:
#   bearer   - access token below (e.g. from `gcloud auth print-access-token`)
#   metadata - token from the Google Cloud metadata server
#   emulator - fixed owner token of the Firestore emulator
#   none     - no authentication
# FIRESTORE_EMULATOR_HOST selects the emulator and emulator auth by itself.
auth_type = "bearer"

# OAuth2 access token for bearer auth. Uncomment to read it from the
# environment, or set FSEXPORT_FIRESTORE_ACCESS_TOKEN instead.
# access_token = "${FSEXPORT_ACCESS_TOKEN}"

# Metadata server token endpoint for metadata auth
metadata_url = "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"

# Per-request timeout in seconds
timeout_seconds = 60

# Verify TLS certificates
tls_verify = true

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Collections to export, in order. Each becomes <name>.json
collections = ["applied_jobs", "companies", "company_portfolios", "profiles"]

# Directory the files are written to
output_dir = "."

# Fetch and count documents without writing files
dry_run = false

# ============================================================================
# Verification
# ============================================================================
[verification]
# Re-read every written file and compare checksum and document ids
enable_verification = false

# ============================================================================
# Logging
# ============================================================================
[logging]
# Also write JSON logs to a rotating file
local_enabled = false

# Directory for log files
local_path = "./logs"

# Rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::EMULATOR_HOST_ENV;
    use crate::config::{read_config, secret_string, AuthType, ExporterConfig, ENV_MUTEX};
    use test_case::test_case;

    fn parse(template: &str) -> ExporterConfig {
        toml::from_str(template).unwrap()
    }

    #[test_case(InitArgs::generate_minimal_config() ; "minimal")]
    #[test_case(InitArgs::generate_config_with_examples() ; "with examples")]
    fn test_template_is_valid_with_token(template: String) {
        let mut config = parse(&template);
        assert!(config.firestore.access_token.is_none());

        config.firestore.access_token = Some(secret_string("test-token".to_string()));
        config.validate().unwrap();
        assert_eq!(config.export.collections.len(), 4);
    }

    #[test_case(InitArgs::generate_minimal_config() ; "minimal")]
    #[test_case(InitArgs::generate_config_with_examples() ; "with examples")]
    fn test_template_has_no_active_placeholders(template: String) {
        let active = template
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .find(|line| line.contains("${"));
        assert_eq!(active, None);
    }

    #[test_case(false ; "minimal")]
    #[test_case(true ; "with examples")]
    fn test_template_loads_against_emulator_without_token(with_examples: bool) {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("firestore-export.toml");
        let template = if with_examples {
            InitArgs::generate_config_with_examples()
        } else {
            InitArgs::generate_minimal_config()
        };
        fs::write(&path, template).unwrap();

        std::env::remove_var("FSEXPORT_ACCESS_TOKEN");
        std::env::set_var(EMULATOR_HOST_ENV, "localhost:8080");
        let config = read_config(&path);
        std::env::remove_var(EMULATOR_HOST_ENV);

        let config = config.unwrap();
        assert_eq!(config.firestore.auth_type, AuthType::Emulator);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_with_examples_defaults() {
        let config = parse(&InitArgs::generate_config_with_examples());
        assert_eq!(config.firestore.database_id, "(default)");
        assert_eq!(config.firestore.timeout_seconds, 60);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("firestore-export.toml");
        fs::write(&output, "keep me").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("firestore-export.toml");
        fs::write(&output, "old").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[firestore]"));
    }
}

//! Configuration management for the exporter.
//!
//! Configuration is a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FSEXPORT_<SECTION>_<KEY>` environment overrides
//! - `GOOGLE_CLOUD_PROJECT` and `FIRESTORE_EMULATOR_HOST`, as honoured by the
//!   Google client libraries
//! - Default values for optional settings and validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use firestore_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("firestore-export.toml")?;
//!
//! println!("Project: {}", config.firestore.project_id);
//! println!("Collections: {:?}", config.export.collections);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [firestore]
//! project_id = "my-project"
//! auth_type = "bearer"
//! access_token = "${FSEXPORT_ACCESS_TOKEN}"
//!
//! [export]
//! collections = ["applied_jobs", "companies", "company_portfolios", "profiles"]
//! output_dir = "."
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, read_config};
pub use schema::{
    ApplicationConfig, AuthType, ExportConfig, ExporterConfig, FirestoreConfig, LoggingConfig,
    VerificationConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

/// Serializes tests that read or modify environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

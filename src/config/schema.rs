//! Configuration schema types
//!
//! This module defines the configuration structure mapped from the TOML file.

use crate::config::SecretString;
use crate::domain::CollectionName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the Firestore client authenticates its requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Pre-issued OAuth2 access token sent as a bearer token
    #[default]
    Bearer,
    /// Token fetched from the GCE / Cloud Run metadata server
    Metadata,
    /// Emulator owner credentials (`Authorization: Bearer owner`), which
    /// bypass security rules on the Firestore emulator
    Emulator,
    /// No credentials
    #[serde(rename = "none")]
    Anonymous,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthType::Bearer => "bearer",
            AuthType::Metadata => "metadata",
            AuthType::Emulator => "emulator",
            AuthType::Anonymous => "none",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bearer" => Ok(AuthType::Bearer),
            "metadata" => Ok(AuthType::Metadata),
            "emulator" => Ok(AuthType::Emulator),
            "none" => Ok(AuthType::Anonymous),
            other => Err(format!(
                "Invalid auth_type '{other}'. Must be one of: bearer, metadata, emulator, none"
            )),
        }
    }
}

/// Main exporter configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Firestore connection settings
    pub firestore: FirestoreConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Post-export verification
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.firestore.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Firestore connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id (falls back to `GOOGLE_CLOUD_PROJECT`)
    #[serde(default)]
    pub project_id: String,

    /// Firestore database id
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// REST API root, e.g. `https://firestore.googleapis.com/v1`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication type
    #[serde(default)]
    pub auth_type: AuthType,

    /// OAuth2 access token used with `auth_type = "bearer"`
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<SecretString>,

    /// Metadata server token endpoint used with `auth_type = "metadata"`
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable this against a local emulator behind a self-signed proxy.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl FirestoreConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.project_id.trim().is_empty() {
            return Err(
                "firestore.project_id cannot be empty (set it or GOOGLE_CLOUD_PROJECT)".to_string(),
            );
        }

        if self.project_id.contains('/') {
            return Err("firestore.project_id must not contain '/'".to_string());
        }

        if self.database_id.trim().is_empty() {
            return Err("firestore.database_id cannot be empty".to_string());
        }

        validate_http_url("firestore.base_url", &self.base_url)?;

        match self.auth_type {
            AuthType::Bearer => {
                let missing = self
                    .access_token
                    .as_ref()
                    .map(|t| t.expose_secret().is_blank())
                    .unwrap_or(true);
                if missing {
                    return Err(
                        "firestore.access_token cannot be empty when auth_type is 'bearer'"
                            .to_string(),
                    );
                }
            }
            AuthType::Metadata => {
                validate_http_url("firestore.metadata_url", &self.metadata_url)?;
            }
            AuthType::Emulator | AuthType::Anonymous => {}
        }

        if self.timeout_seconds == 0 {
            return Err("firestore.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// URL of the `documents` resource of the configured database
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id
        )
    }
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: default_database_id(),
            base_url: default_base_url(),
            auth_type: AuthType::default(),
            access_token: None,
            metadata_url: default_metadata_url(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), String> {
    let parsed =
        url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL '{value}': {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Collections to export, in export order
    pub collections: Vec<String>,

    /// Directory the `<collection>.json` files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Dry run mode - fetch and count documents without writing files
    #[serde(default)]
    pub dry_run: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.collections.is_empty() {
            return Err("export.collections cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for name in &self.collections {
            CollectionName::new(name.as_str())
                .map_err(|e| format!("export.collections: {e}"))?;
            if !seen.insert(name.as_str()) {
                return Err(format!(
                    "export.collections lists '{name}' more than once"
                ));
            }
        }

        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        Ok(())
    }

    /// Parsed collection names in configured order
    pub fn collection_names(&self) -> crate::domain::Result<Vec<CollectionName>> {
        self.collections
            .iter()
            .map(|name| CollectionName::new(name.as_str()))
            .collect()
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collections: Vec::new(),
            output_dir: default_output_dir(),
            dry_run: false,
        }
    }
}

/// Data verification configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerificationConfig {
    /// Re-read and check every written file after the export
    #[serde(default)]
    pub enable_verification: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging (JSON lines)
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }

    /// Console-only logging, used before a configuration file is available
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

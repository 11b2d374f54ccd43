//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthType, ExporterConfig};
use super::secret::secret_string;
use crate::domain::errors::ExporterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Environment variable honoured by the official SDKs to target the emulator
pub const EMULATOR_HOST_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// Environment variable used as project id fallback
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (FSEXPORT_* prefix)
/// 5. Applies `GOOGLE_CLOUD_PROJECT` and `FIRESTORE_EMULATOR_HOST`
/// 6. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if any step fails.
///
/// # Examples
///
/// ```no_run
/// use firestore_export::config::loader::load_config;
///
/// let config = load_config("firestore-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let config = read_config(path)?;

    config.validate().map_err(|e| {
        ExporterError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// Lets callers apply command-line overrides before validation.
pub fn read_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExporterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExporterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text and applies environment overrides, without validating
pub fn parse_config(contents: &str) -> Result<ExporterConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| ExporterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    apply_google_env(&mut config);

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. All missing variables are reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ExporterError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ExporterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the FSEXPORT_* prefix
///
/// Environment variables follow the pattern: FSEXPORT_<SECTION>_<KEY>,
/// for example FSEXPORT_FIRESTORE_PROJECT_ID or FSEXPORT_EXPORT_OUTPUT_DIR.
fn apply_env_overrides(config: &mut ExporterConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("FSEXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Firestore overrides
    if let Ok(val) = std::env::var("FSEXPORT_FIRESTORE_PROJECT_ID") {
        config.firestore.project_id = val;
    }
    if let Ok(val) = std::env::var("FSEXPORT_FIRESTORE_DATABASE_ID") {
        config.firestore.database_id = val;
    }
    if let Ok(val) = std::env::var("FSEXPORT_FIRESTORE_BASE_URL") {
        config.firestore.base_url = val;
    }
    if let Ok(val) = std::env::var("FSEXPORT_FIRESTORE_AUTH_TYPE") {
        config.firestore.auth_type = val
            .parse::<AuthType>()
            .map_err(|e| ExporterError::Configuration(format!("FSEXPORT_FIRESTORE_AUTH_TYPE: {e}")))?;
    }
    if let Ok(val) = std::env::var("FSEXPORT_FIRESTORE_ACCESS_TOKEN") {
        config.firestore.access_token = Some(secret_string(val));
    }
    if let Some(timeout) = parse_env("FSEXPORT_FIRESTORE_TIMEOUT_SECONDS")? {
        config.firestore.timeout_seconds = timeout;
    }
    if let Some(tls_verify) = parse_env("FSEXPORT_FIRESTORE_TLS_VERIFY")? {
        config.firestore.tls_verify = tls_verify;
    }

    // Export overrides
    if let Ok(val) = std::env::var("FSEXPORT_EXPORT_COLLECTIONS") {
        config.export.collections = split_list(&val);
    }
    if let Ok(val) = std::env::var("FSEXPORT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(dry_run) = parse_env("FSEXPORT_EXPORT_DRY_RUN")? {
        config.export.dry_run = dry_run;
    }

    // Verification overrides
    if let Some(enabled) = parse_env("FSEXPORT_VERIFICATION_ENABLE_VERIFICATION")? {
        config.verification.enable_verification = enabled;
    }

    // Logging overrides
    if let Some(enabled) = parse_env("FSEXPORT_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("FSEXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Reads and parses a typed override; a set but unparsable value is an error
fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|e| {
            ExporterError::Configuration(format!("{name}: invalid value '{val}': {e}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies the variables the Google client libraries honour
fn apply_google_env(config: &mut ExporterConfig) {
    if config.firestore.project_id.trim().is_empty() {
        if let Ok(project) = std::env::var(PROJECT_ENV) {
            config.firestore.project_id = project;
        }
    }

    if let Ok(host) = std::env::var(EMULATOR_HOST_ENV) {
        let host = host.trim();
        if !host.is_empty() {
            config.firestore.base_url = format!("http://{host}/v1");
            config.firestore.auth_type = AuthType::Emulator;
        }
    }
}

/// Splits a comma-separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

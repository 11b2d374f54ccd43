//! Integration tests for configuration loading and validation

use firestore_export::config::{load_config, AuthType};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for var in [
        "FSEXPORT_APPLICATION_LOG_LEVEL",
        "FSEXPORT_FIRESTORE_PROJECT_ID",
        "FSEXPORT_FIRESTORE_ACCESS_TOKEN",
        "FSEXPORT_EXPORT_COLLECTIONS",
        "FSEXPORT_EXPORT_OUTPUT_DIR",
        "FSEXPORT_EXPORT_DRY_RUN",
        "FIRESTORE_EMULATOR_HOST",
        "GOOGLE_CLOUD_PROJECT",
        "TEST_FIRESTORE_TOKEN",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[firestore]
project_id = "acme-prod"
database_id = "backups"
base_url = "https://firestore.googleapis.com/v1"
auth_type = "bearer"
access_token = "ya29.token"
timeout_seconds = 30
tls_verify = true

[export]
collections = ["applied_jobs", "companies", "company_portfolios", "profiles"]
output_dir = "./out"
dry_run = false

[verification]
enable_verification = true

[logging]
local_enabled = true
local_path = "/var/log/firestore-export"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.firestore.project_id, "acme-prod");
    assert_eq!(config.firestore.auth_type, AuthType::Bearer);
    assert_eq!(
        config
            .firestore
            .access_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "ya29.token"
    );
    assert_eq!(
        config.firestore.documents_url(),
        "https://firestore.googleapis.com/v1/projects/acme-prod/databases/backups/documents"
    );
    assert_eq!(
        config.export.collections,
        vec!["applied_jobs", "companies", "company_portfolios", "profiles"]
    );
    assert_eq!(config.export.output_dir, "./out");
    assert!(config.verification.enable_verification);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[firestore]
project_id = "demo"
auth_type = "metadata"

[export]
collections = ["profiles"]
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.firestore.database_id, "(default)");
    assert_eq!(config.firestore.timeout_seconds, 60);
    assert_eq!(config.export.output_dir, ".");
    assert!(!config.export.dry_run);
    assert!(!config.verification.enable_verification);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_substitution_and_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_FIRESTORE_TOKEN", "from-substitution");
    std::env::set_var("FSEXPORT_EXPORT_COLLECTIONS", "companies,profiles");
    std::env::set_var("FSEXPORT_EXPORT_DRY_RUN", "true");

    let file = write_config(
        r#"
[firestore]
project_id = "demo"
# access_token = "${NOT_SUBSTITUTED_IN_COMMENTS}"
access_token = "${TEST_FIRESTORE_TOKEN}"

[export]
collections = ["applied_jobs"]
"#,
    );

    let config = load_config(file.path());
    cleanup_env_vars();
    let config = config.unwrap();

    assert_eq!(
        config
            .firestore
            .access_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_ref(),
        "from-substitution"
    );
    assert_eq!(config.export.collections, vec!["companies", "profiles"]);
    assert!(config.export.dry_run);
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[firestore]
project_id = "demo"
access_token = "${TEST_FIRESTORE_TOKEN}"

[export]
collections = ["profiles"]
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_FIRESTORE_TOKEN"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_emulator_host_switches_to_emulator() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FIRESTORE_EMULATOR_HOST", "127.0.0.1:8080");
    std::env::set_var("GOOGLE_CLOUD_PROJECT", "emulated");

    let file = write_config(
        r#"
[firestore]
auth_type = "bearer"

[export]
collections = ["profiles"]
"#,
    );

    let config = load_config(file.path());
    cleanup_env_vars();
    let config = config.unwrap();

    assert_eq!(config.firestore.project_id, "emulated");
    assert_eq!(config.firestore.auth_type, AuthType::Emulator);
    assert_eq!(
        config.firestore.documents_url(),
        "http://127.0.0.1:8080/v1/projects/emulated/databases/(default)/documents"
    );
}

#[test]
fn test_invalid_configs_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        // bearer without token
        r#"
[firestore]
project_id = "demo"
[export]
collections = ["profiles"]
"#,
        // empty collection list
        r#"
[firestore]
project_id = "demo"
auth_type = "none"
[export]
collections = []
"#,
        // path-like collection name
        r#"
[firestore]
project_id = "demo"
auth_type = "none"
[export]
collections = ["../secrets"]
"#,
        // duplicate collection
        r#"
[firestore]
project_id = "demo"
auth_type = "none"
[export]
collections = ["profiles", "profiles"]
"#,
        // unknown log level
        r#"
[application]
log_level = "loud"
[firestore]
project_id = "demo"
auth_type = "none"
[export]
collections = ["profiles"]
"#,
    ];

    for content in cases {
        let file = write_config(content);
        let err = load_config(file.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2, "expected config error for {content}");
    }
}

#[test]
fn test_missing_config_file() {
    let err = load_config("/nonexistent/firestore-export.toml").unwrap_err();
    assert!(err.to_string().contains("not found"));
}

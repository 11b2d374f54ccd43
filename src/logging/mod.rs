//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable console output
//! - Configurable log levels (`RUST_LOG` overrides)
//! - Optional JSON log file with rotation
//!
//! # Example
//!
//! ```no_run
//! use firestore_export::config::LoggingConfig;
//! use firestore_export::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(collection = "profiles", "Exporting collection");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the start of a collection export
///
/// ```no_run
/// use firestore_export::log_collection_start;
///
/// log_collection_start!("profiles");
/// ```
#[macro_export]
macro_rules! log_collection_start {
    ($collection:expr) => {
        tracing::info!(
            collection = %$collection,
            "Exporting collection: {}...",
            $collection
        )
    };
}

/// Log a finished collection export with its progress line
///
/// ```no_run
/// use firestore_export::core::export::CollectionExport;
/// use firestore_export::domain::CollectionName;
/// use firestore_export::log_collection_exported;
///
/// let export = CollectionExport {
///     collection: CollectionName::new("profiles").unwrap(),
///     document_count: 2,
///     document_ids: vec!["u1".into(), "u2".into()],
///     output: None,
/// };
/// log_collection_exported!(&export);
/// ```
#[macro_export]
macro_rules! log_collection_exported {
    ($export:expr) => {
        tracing::info!(
            collection = %$export.collection,
            count = $export.document_count,
            "{}",
            $export.progress_line()
        );
    };
}

/// Log an error with the step that failed as the message
///
/// ```no_run
/// use firestore_export::domain::ExporterError;
/// use firestore_export::log_error_with_context;
///
/// let error = ExporterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(error = %$error, "{}", $context);
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::ExporterError;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_log_error_with_context() {
        let error = ExporterError::Configuration("timeout_seconds must be > 0".to_string());
        let output = capture(|| {
            crate::log_error_with_context!(&error, "Failed to load configuration");
        });

        assert!(output.contains("ERROR"));
        assert!(output.contains("Failed to load configuration"));
        assert!(output.contains("timeout_seconds must be > 0"));
    }

    #[test]
    fn test_log_collection_start() {
        let output = capture(|| crate::log_collection_start!("profiles"));
        assert!(output.contains("Exporting collection: profiles..."));
    }
}

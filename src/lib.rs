//! # firestore-export
//!
//! Dumps whole Firestore collections to local JSON files, one
//! `<collection>.json` per collection, keyed by document id.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export coordination, file writing, verification
//! - [`adapters`] - Document sources (Firestore REST)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firestore_export::config::load_config;
//! use firestore_export::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("firestore-export.toml")?;
//!     let coordinator = ExportCoordinator::from_config(&config)?;
//!
//!     let summary = coordinator.execute_export().await?;
//!     println!("Exported {} documents", summary.total_documents);
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! Each file holds a single JSON object mapping document ids to document data,
//! indented with two spaces. Keys are sorted, so unchanged data always
//! produces byte-identical files. Collections are exported one at a time and
//! the first error stops the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

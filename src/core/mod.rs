//! Core export logic.
//!
//! # Modules
//!
//! - [`export`] - Export coordination, file writing and run summary
//! - [`verification`] - Post-export checks of the written files
//!
//! # Export Workflow
//!
//! For every configured collection, in order:
//!
//! 1. **Fetch**: read a snapshot of all documents from the source
//! 2. **Map**: build the document id → data mapping
//! 3. **Write**: serialize it to `<collection>.json`
//! 4. **Report**: log the number of exported documents
//!
//! Afterwards the written files are optionally verified and the summary is logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use firestore_export::config::load_config;
//! use firestore_export::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("firestore-export.toml")?;
//! let coordinator = ExportCoordinator::from_config(&config)?;
//!
//! let summary = coordinator.execute_export().await?;
//! println!("Exported {} documents", summary.total_documents);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod verification;

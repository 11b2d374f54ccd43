//! Export orchestration
//!
//! - [`coordinator`] runs the sequential per-collection export
//! - [`writer`] writes `<collection>.json` files atomically
//! - [`summary`] records what a run produced

pub mod coordinator;
pub mod summary;
pub mod writer;

pub use coordinator::ExportCoordinator;
pub use summary::{CollectionExport, ExportSummary};
pub use writer::{ExportWriter, WrittenFile};

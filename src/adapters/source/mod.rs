//! Document sources the exporter can read from

pub mod factory;
pub mod traits;

pub use factory::create_document_source;
pub use traits::DocumentSource;

//! Post-export verification
//!
//! Checks that the files on disk are exactly the ones written during the run.

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport};
pub use verify::Verifier;

//! Firestore adapter
//!
//! Talks to the Firestore REST API (v1) and decodes its typed values into the
//! JSON documents the exporter writes.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::TokenProvider;
pub use client::FirestoreClient;

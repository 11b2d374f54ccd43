//! Documents and export files
//!
//! A [`Document`] is an opaque `(id, data)` pair as returned by a document
//! source. An [`ExportFile`] is the id → data mapping written for one
//! collection.

use super::errors::ExporterError;
use super::ids::{CollectionName, DocumentId};
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single document read from a collection
///
/// The data is opaque to the exporter; no schema is assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier, unique within its collection
    pub id: DocumentId,

    /// Document payload
    pub data: Value,
}

impl Document {
    /// Creates a document from a raw id and its data
    pub fn new(id: impl Into<String>, data: Value) -> Result<Self> {
        Ok(Self {
            id: DocumentId::new(id)?,
            data,
        })
    }
}

/// Mapping from document id to document data for one collection
///
/// Keys are kept sorted so that the serialized file does not depend on the
/// order in which the source returned the documents.
///
/// # Examples
///
/// ```
/// use firestore_export::domain::{CollectionName, Document, ExportFile};
/// use serde_json::json;
///
/// let collection = CollectionName::new("profiles").unwrap();
/// let file = ExportFile::from_documents(
///     &collection,
///     vec![
///         Document::new("u2", json!({"name": "Bo"})).unwrap(),
///         Document::new("u1", json!({"name": "Ann"})).unwrap(),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(file.ids().collect::<Vec<_>>(), vec!["u1", "u2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportFile {
    entries: BTreeMap<String, Value>,
}

impl ExportFile {
    /// Builds the mapping for a collection
    ///
    /// # Errors
    ///
    /// Returns a fetch error for `collection` if the same document id
    /// appears twice, since the file could no longer hold every document.
    pub fn from_documents(collection: &CollectionName, documents: Vec<Document>) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for document in documents {
            let id = document.id.into_inner();
            if entries.contains_key(&id) {
                return Err(ExporterError::Validation(format!(
                    "duplicate document id '{id}' returned by the source"
                ))
                .in_collection(collection.as_str()));
            }
            entries.insert(id, document.data);
        }

        Ok(Self { entries })
    }

    /// Number of documents in the file
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the collection was empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Document ids in output order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Looks up the data of a document
    pub fn get(&self, id: &str) -> Option<&Value> {
        self.entries.get(id)
    }

    /// Serializes the mapping as JSON indented with two spaces
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

//! Domain identifier types with validation
//!
//! Newtype wrappers for Firestore identifiers. A [`CollectionName`] doubles as
//! the stem of an output file name, so its validation also keeps exports
//! inside the output directory.

use super::errors::ExporterError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of a top-level Firestore collection
///
/// # Examples
///
/// ```
/// use firestore_export::domain::ids::CollectionName;
/// use std::str::FromStr;
///
/// let name = CollectionName::from_str("company_portfolios").unwrap();
/// assert_eq!(name.as_str(), "company_portfolios");
/// assert_eq!(name.file_name(), "company_portfolios.json");
///
/// assert!(CollectionName::from_str("users/u1/orders").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a new CollectionName
    ///
    /// Firestore collection ids must be non-empty, must not contain `/`,
    /// must not be `.` or `..` and must not match `__.*__`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ExporterError::Validation(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if name.contains('/') {
            return Err(ExporterError::Validation(format!(
                "Collection name '{name}' must not contain '/'"
            )));
        }

        if name == "." || name == ".." {
            return Err(ExporterError::Validation(format!(
                "Collection name '{name}' is not allowed"
            )));
        }

        if name.len() > 4 && name.starts_with("__") && name.ends_with("__") {
            return Err(ExporterError::Validation(format!(
                "Collection name '{name}' is reserved"
            )));
        }

        if name.contains('\\') || name.contains('\0') {
            return Err(ExporterError::Validation(format!(
                "Collection name '{}' contains characters that are not valid in a file name",
                name.escape_debug()
            )));
        }

        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the export file for this collection (`<name>.json`)
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for CollectionName {
    type Error = ExporterError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a document within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ExporterError::Validation(
                "Document ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Extracts the document id from a full resource name such as
    /// `projects/p/databases/(default)/documents/profiles/u1`
    pub fn from_resource_name(name: &str) -> Result<Self> {
        let id = name.rsplit('/').next().unwrap_or_default();
        Self::new(id).map_err(|_| {
            ExporterError::Validation(format!("Document name '{name}' has no document id"))
        })
    }

    /// Returns the document ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

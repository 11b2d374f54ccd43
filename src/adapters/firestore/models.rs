//! Firestore REST API models
//!
//! Request and response shapes of `documents:runQuery`, and decoding of
//! Firestore typed values into plain JSON.
//!
//! Values are decoded to the same JSON the Node.js admin SDK produces for
//! `JSON.stringify(doc.data())`, so existing consumers of exported files keep
//! working:
//!
//! | Firestore value   | JSON                                         |
//! |-------------------|----------------------------------------------|
//! | `timestampValue`  | `{"_seconds": s, "_nanoseconds": n}`         |
//! | `geoPointValue`   | `{"_latitude": lat, "_longitude": lng}`      |
//! | `bytesValue`      | `{"type": "Buffer", "data": [..]}`           |
//! | `referenceValue`  | document path below the database root        |
//! | non-finite double | `null`                                       |

use crate::domain::{Document, ExporterError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Body of a `documents:runQuery` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

impl RunQueryRequest {
    /// Query selecting every document of a top-level collection
    pub fn for_collection(collection_id: &str) -> Self {
        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: collection_id.to_string(),
                }],
                limit: None,
            },
        }
    }

    /// Restricts the number of returned documents
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.structured_query.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

/// One element of the `runQuery` response array
///
/// Elements without a document only carry progress information
/// (`readTime`, `skippedResults`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponseItem {
    #[serde(default)]
    pub document: Option<FirestoreDocument>,

    #[serde(default)]
    pub read_time: Option<String>,

    #[serde(default)]
    pub error: Option<RpcStatus>,
}

/// Error status embedded in a streamed response
#[derive(Debug, Clone, Deserialize)]
pub struct RpcStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Error body returned with a non-success HTTP status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: RpcStatus,
}

/// A Firestore document as returned by the REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirestoreDocument {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{path}`
    pub name: String,

    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,

    #[serde(default)]
    pub create_time: Option<String>,

    #[serde(default)]
    pub update_time: Option<String>,
}

impl FirestoreDocument {
    /// Converts into an exporter document (id + plain JSON data)
    pub fn into_document(self) -> Result<Document> {
        let id = crate::domain::DocumentId::from_resource_name(&self.name)?;
        let data = fields_to_json(self.fields)?;
        Ok(Document { id, data })
    }
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<FirestoreValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: BTreeMap<String, FirestoreValue>,
}

/// int64 values arrive as decimal strings in proto3 JSON, numbers are accepted too
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Int64Repr {
    Number(i64),
    Text(String),
}

/// doubles arrive as numbers, or as "NaN" / "Infinity" / "-Infinity"
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DoubleRepr {
    Number(f64),
    Text(String),
}

/// A typed Firestore value
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FirestoreValue {
    NullValue,
    BooleanValue(bool),
    IntegerValue(Int64Repr),
    DoubleValue(DoubleRepr),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(LatLng),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

impl FirestoreValue {
    /// Decodes into plain JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed integers, timestamps or
    /// base64 payloads.
    pub fn into_json(self) -> Result<Value> {
        let value = match self {
            FirestoreValue::NullValue => Value::Null,
            FirestoreValue::BooleanValue(b) => Value::Bool(b),
            FirestoreValue::IntegerValue(Int64Repr::Number(n)) => json!(n),
            FirestoreValue::IntegerValue(Int64Repr::Text(s)) => {
                let n: i64 = s.trim().parse().map_err(|_| {
                    ExporterError::Serialization(format!("invalid integerValue '{s}'"))
                })?;
                json!(n)
            }
            FirestoreValue::DoubleValue(DoubleRepr::Number(f)) => finite_number(f),
            FirestoreValue::DoubleValue(DoubleRepr::Text(s)) => match s.as_str() {
                "NaN" | "Infinity" | "-Infinity" => Value::Null,
                other => {
                    let f: f64 = other.parse().map_err(|_| {
                        ExporterError::Serialization(format!("invalid doubleValue '{other}'"))
                    })?;
                    finite_number(f)
                }
            },
            FirestoreValue::TimestampValue(ts) => {
                let parsed = DateTime::parse_from_rfc3339(&ts).map_err(|e| {
                    ExporterError::Serialization(format!("invalid timestampValue '{ts}': {e}"))
                })?;
                json!({
                    "_seconds": parsed.timestamp(),
                    "_nanoseconds": parsed.timestamp_subsec_nanos(),
                })
            }
            FirestoreValue::StringValue(s) => Value::String(s),
            FirestoreValue::BytesValue(encoded) => {
                let bytes = general_purpose::STANDARD
                    .decode(encoded.as_bytes())
                    .or_else(|_| general_purpose::URL_SAFE.decode(encoded.as_bytes()))
                    .map_err(|e| {
                        ExporterError::Serialization(format!("invalid bytesValue: {e}"))
                    })?;
                json!({ "type": "Buffer", "data": bytes })
            }
            FirestoreValue::ReferenceValue(name) => Value::String(reference_path(&name)),
            FirestoreValue::GeoPointValue(point) => json!({
                "_latitude": finite_number(point.latitude),
                "_longitude": finite_number(point.longitude),
            }),
            FirestoreValue::ArrayValue(array) => Value::Array(
                array
                    .values
                    .into_iter()
                    .map(FirestoreValue::into_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            FirestoreValue::MapValue(map) => fields_to_json(map.fields)?,
        };

        Ok(value)
    }
}

/// Converts a document's or map's fields into a JSON object
pub fn fields_to_json(fields: BTreeMap<String, FirestoreValue>) -> Result<Value> {
    let mut object = Map::new();
    for (key, value) in fields {
        object.insert(key, value.into_json()?);
    }
    Ok(Value::Object(object))
}

/// Largest integer a double holds exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Renders a double the way `JSON.stringify` does: whole numbers without a
/// fractional part, non-finite values as `null`
fn finite_number(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER {
        return json!(f as i64);
    }
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// `projects/p/databases/d/documents/companies/acme` → `companies/acme`
fn reference_path(name: &str) -> String {
    name.split_once("/documents/")
        .map(|(_, path)| path.to_string())
        .unwrap_or_else(|| name.to_string())
}

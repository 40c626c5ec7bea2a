//! Conversion between request/response JSON and BSON documents.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value as JsonValue};

use crate::{Error, Result};

/// Renders a BSON value as plain JSON.
///
/// ObjectIds become their 24-character hex string and dates become RFC 3339
/// strings; everything else uses relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> JsonValue {
    match value {
        Bson::ObjectId(oid) => JsonValue::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => JsonValue::String(s),
            Err(_) => JsonValue::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => JsonValue::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_json(doc: Document) -> JsonValue {
    JsonValue::Object(
        doc.into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect::<Map<String, JsonValue>>(),
    )
}

pub fn documents_to_json(docs: Vec<Document>) -> JsonValue {
    JsonValue::Array(docs.into_iter().map(document_to_json).collect())
}

/// Converts a JSON request body into a document; the body must be an object.
pub fn json_to_document(value: JsonValue) -> Result<Document> {
    if !value.is_object() {
        return Err(Error::Validation(
            "Request body must be a JSON object".into(),
        ));
    }
    mongodb::bson::to_document(&value)
        .map_err(|e| Error::Validation(format!("Invalid document: {e}")))
}

/// String-valued fields of a document, in document order.
///
/// Used to feed search bodies to the filter builder: non-string values can
/// not be search terms and are skipped.
pub fn string_fields(doc: &Document) -> Vec<(String, String)> {
    doc.iter()
        .filter_map(|(key, value)| match value {
            Bson::String(s) => Some((key.clone(), s.clone())),
            _ => None,
        })
        .collect()
}

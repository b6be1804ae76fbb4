//! Conversion between internal document identifiers and their external form
//!
//! Every document leaving the API goes through [`present`]: `ObjectId`s become
//! 24-character hex strings and `_id` keys become `id`, at any nesting depth.

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{AppError, AppResult};

/// Parse an external identifier, rejecting anything that is not 24 hex characters
pub fn parse_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidId(format!("Invalid ID: {}", id)))
}

/// Parse an identifier that is allowed to be absent or malformed
pub fn resolvable_id(id: Option<&str>) -> Option<ObjectId> {
    id.and_then(|s| ObjectId::parse_str(s).ok())
}

/// Convert a stored document into its public JSON form
pub fn present(doc: Document) -> Value {
    present_document(doc)
}

/// Convert a list of stored documents
pub fn present_all(docs: Vec<Document>) -> Vec<Value> {
    docs.into_iter().map(present).collect()
}

/// Convert any serializable model by going through its stored representation
pub fn present_model<T: Serialize>(model: &T) -> AppResult<Value> {
    Ok(present(mongodb::bson::to_document(model)?))
}

fn present_document(doc: Document) -> Value {
    let mut map = Map::with_capacity(doc.len());
    for (key, value) in doc {
        let key = if key == "_id" { "id".to_string() } else { key };
        map.insert(key, present_value(value));
    }
    Value::Object(map)
}

fn present_value(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => present_document(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(present_value).collect()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::Null,
        },
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        other => other.into_relaxed_extjson(),
    }
}

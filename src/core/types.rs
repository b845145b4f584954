use super::{DbError, Result};
use serde_json::{Map, Value};

/// A stored record: field name to JSON value, field order preserved.
pub type Document = Map<String, Value>;

/// Reserved identity field every stored document carries.
pub const ID_FIELD: &str = "_id";

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the inner map if `value` is a JSON object.
pub fn expect_object(value: Value) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DbError::type_mismatch("object", json_type_name(&other))),
    }
}

/// Returns the inner list if `value` is a JSON array.
pub fn expect_array(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(DbError::type_mismatch("array", json_type_name(&other))),
    }
}

/// Returns the inner string if `value` is a JSON string.
pub fn expect_str(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DbError::type_mismatch("string", json_type_name(&other))),
    }
}

//! JSON ingestion: build [`DataMap`]s from `serde_json` documents.
//!
//! Fixture files and API payloads arrive as JSON objects; this module maps
//! them onto the raw-value model. Nested objects become nested data maps
//! (relation data), arrays become lists (to-many input or composite keys).

use serde_json::Value as JsonValue;

use crate::core::{HydrateError, Result, Value};
use crate::instantiate::{DataMap, Raw};

/// Convert a JSON object into field data, preserving key order as
/// serde_json reports it.
pub fn data_from_json(json: &JsonValue) -> Result<DataMap> {
    match json {
        JsonValue::Object(fields) => {
            let mut data = DataMap::new();
            for (name, value) in fields {
                data.insert(name.clone(), raw_from_json(value)?);
            }
            Ok(data)
        }
        other => Err(HydrateError::Unsupported(format!(
            "expected a JSON object, got {}",
            json_kind(other)
        ))),
    }
}

/// Convert a single JSON value into a raw field value.
pub fn raw_from_json(json: &JsonValue) -> Result<Raw> {
    Ok(match json {
        JsonValue::Null => Raw::Value(Value::Null),
        JsonValue::Bool(b) => Raw::Value(Value::Boolean(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Raw::Value(Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Raw::Value(Value::Float(f))
            } else {
                return Err(HydrateError::Unsupported(format!(
                    "unrepresentable JSON number {}",
                    n
                )));
            }
        }
        JsonValue::String(s) => Raw::Value(Value::Text(s.clone())),
        JsonValue::Array(items) => Raw::List(
            items
                .iter()
                .map(raw_from_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        JsonValue::Object(_) => Raw::Map(data_from_json(json)?),
    })
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

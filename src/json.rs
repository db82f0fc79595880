//! The format adapter: plain values to and from JSON text.
//!
//! Thin glue over `serde_json`. The walker runs before serialization and
//! after parsing; this module only moves a tag-carrying *plain* tree (no
//! rich leaves, string keys only) across the JSON boundary.

use crate::{Error, Number, Result, Scalar, TagMap, Value};
use serde_json::Value as JsonValue;

/// Serializes a plain value tree to JSON text.
///
/// # Errors
///
/// Fails on non-finite floats (JSON has no spelling for them), on residual
/// rich leaves, and on non-string keys; the last two indicate the walker was
/// skipped.
pub(crate) fn write(value: &Value, pretty: bool) -> Result<String> {
    let json = to_json(value)?;
    let out = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    out.map_err(|e| Error::json(&e))
}

/// Parses JSON text into a plain value tree.
pub(crate) fn read(text: &str) -> Result<Value> {
    let json: JsonValue = serde_json::from_str(text).map_err(|e| Error::json(&e))?;
    Ok(from_json(json))
}

fn to_json(value: &Value) -> Result<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(b) => Ok(JsonValue::Bool(*b)),
        Value::Number(Number::Int(i)) => Ok(JsonValue::from(*i)),
        Value::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .ok_or_else(|| Error::Json(format!("non-finite float {} has no JSON form", f))),
        Value::String(s) => Ok(JsonValue::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_json(item)?);
            }
            Ok(JsonValue::Array(out))
        }
        Value::Object(entries) => {
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries.iter() {
                let key = k
                    .as_str()
                    .ok_or_else(|| Error::invalid_key(k.type_name()))?;
                out.insert(key.to_string(), to_json(v)?);
            }
            Ok(JsonValue::Object(out))
        }
        rich => Err(Error::custom(format!(
            "unencoded {} leaf reached the JSON layer",
            rich.type_name()
        ))),
    }
}

fn from_json(json: JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::Int(i))
            } else if let Some(u) = n.as_u64() {
                // beyond the native signed lane
                Value::Scalar(Scalar::U64(u))
            } else {
                Value::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        JsonValue::Object(entries) => {
            let mut out = TagMap::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(Value::String(k), from_json(v));
            }
            Value::Object(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    #[test]
    fn test_write_read_round_trip() {
        let mut map = TagMap::new();
        map.insert(Value::from("a"), Value::from(1));
        map.insert(Value::from("b"), Value::Array(vec![Value::from(true), Value::Null]));
        let value = Value::Object(map);

        let text = write(&value, false).unwrap();
        assert_eq!(read(&text).unwrap(), value);
    }

    #[test]
    fn test_rich_leaf_rejected() {
        let err = write(&Value::Scalar(Scalar::I8(1)), false).unwrap_err();
        assert!(err.to_string().contains("scalar"));
    }

    #[test]
    fn test_non_string_key_rejected() {
        let mut map = TagMap::new();
        map.insert(Value::from(5), Value::Null);
        assert!(write(&Value::Object(map), false).is_err());
    }

    #[test]
    fn test_non_finite_float_rejected() {
        assert!(write(&Value::from(f64::NAN), false).is_err());
    }

    #[test]
    fn test_malformed_text_is_a_structural_error() {
        assert!(matches!(read("{not json"), Err(Error::Json(_))));
    }
}

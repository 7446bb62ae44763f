//! Flat key/value view of any result, for the external export layer.
//!
//! Nested objects become dotted keys. Arrays of scalars stay arrays; arrays
//! holding objects or arrays are expanded with their index as a key segment.
//! Non-finite floats serialize as null.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use bioaudit_core::errors::ExportError;

/// Key used when the value itself is a scalar or an array.
const ROOT_KEY: &str = "value";

pub fn flatten<T: Serialize>(value: &T) -> Result<BTreeMap<String, Value>, ExportError> {
    let json = serde_json::to_value(value)?;
    let mut out = BTreeMap::new();
    match json {
        Value::Object(_) => walk(String::new(), json, &mut out),
        other => walk(ROOT_KEY.to_string(), other, &mut out),
    }
    Ok(out)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn is_scalar(v: &Value) -> bool {
    !matches!(v, Value::Object(_) | Value::Array(_))
}

fn walk(prefix: String, value: Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                walk(join(&prefix, &k), v, out);
            }
        }
        Value::Array(items) if items.iter().all(is_scalar) => {
            out.insert(prefix, Value::Array(items));
        }
        Value::Array(items) => {
            for (i, v) in items.into_iter().enumerate() {
                walk(join(&prefix, &i.to_string()), v, out);
            }
        }
        scalar => {
            out.insert(prefix, scalar);
        }
    }
}

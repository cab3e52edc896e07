//! Canonical encoding of schedule values.

use serde::Serialize;
use serde_json::Value;

use crate::log_error;

/// Canonical key for a schedule, or `None` if it cannot be serialized.
///
/// Callers must skip schedules without a key: they cannot be numbered,
/// favorited, selected or reliably deleted.
pub fn canonical_key<S: Serialize + ?Sized>(schedule: &S) -> Option<String> {
    match serde_json::to_value(schedule) {
        Ok(value) => Some(encode_canonical(&value)),
        Err(err) => {
            log_error!("Skipping schedule that cannot be canonicalized: {}", err);
            None
        }
    }
}

/// Encode a JSON value with object keys sorted and array order kept.
///
/// Does not rely on the map ordering of the JSON library, so the key is the
/// same whichever order an object's fields arrived in.
pub fn encode_canonical(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(item, out);
            }
            out.push('}');
        }
        // Scalars: Display on Value is compact JSON with string escaping.
        scalar => out.push_str(&scalar.to_string()),
    }
}

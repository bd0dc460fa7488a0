//! JSON <-> Firestore typed-value mapping
//!
//! Firestore wraps every field value in a type tag
//! (`{"stringValue": ...}`, `{"integerValue": "42"}`, ...). These helpers
//! convert between that representation and plain JSON so the rest of the
//! service never sees the wrapping.
//!
//! Strings in RFC 3339 form are stored as native timestamps so the store
//! can order on them (renewal due dates, project dates).

use chrono::DateTime;
use serde_json::{json, Map, Value};

use crate::store::JsonMap;

/// Convert a plain JSON field map to Firestore `fields`
pub fn to_firestore_fields(fields: &JsonMap) -> Value {
    let mut out = Map::new();
    for (key, value) in fields {
        out.insert(key.clone(), to_firestore_value(value));
    }
    Value::Object(out)
}

/// Convert Firestore `fields` back to a plain JSON field map
pub fn from_firestore_fields(fields: &Value) -> JsonMap {
    let mut out = JsonMap::new();
    if let Some(map) = fields.as_object() {
        for (key, value) in map {
            out.insert(key.clone(), from_firestore_value(value));
        }
    }
    out
}

fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore carries integers as decimal strings
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => {
            if DateTime::parse_from_rfc3339(s).is_ok() {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => json!({
            "arrayValue": {
                "values": items.iter().map(to_firestore_value).collect::<Vec<_>>(),
            }
        }),
        Value::Object(map) => {
            let mut fields = Map::new();
            for (key, value) in map {
                fields.insert(key.clone(), to_firestore_value(value));
            }
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

fn from_firestore_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };

    if let Some((tag, inner)) = map.iter().next() {
        match tag.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(|i| json!(i))
                .unwrap_or(Value::Null),
            "doubleValue" => inner.clone(),
            "stringValue" | "timestampValue" | "referenceValue" => inner.clone(),
            "arrayValue" => {
                let items = inner
                    .get("values")
                    .and_then(|v| v.as_array())
                    .map(|values| values.iter().map(from_firestore_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => {
                let fields = inner.get("fields").cloned().unwrap_or(json!({}));
                Value::Object(from_firestore_fields(&fields))
            }
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Value)]) -> JsonMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_scalar_round_trip() {
        let fields = map(&[
            ("name", json!("Initech")),
            ("health", json!(72)),
            ("score", json!(4.5)),
            ("active", json!(true)),
            ("notes", Value::Null),
        ]);

        let wire = to_firestore_fields(&fields);
        assert_eq!(wire["name"], json!({"stringValue": "Initech"}));
        assert_eq!(wire["health"], json!({"integerValue": "72"}));
        assert_eq!(wire["score"], json!({"doubleValue": 4.5}));
        assert_eq!(wire["active"], json!({"booleanValue": true}));

        let back = from_firestore_fields(&wire);
        assert_eq!(back, fields);
    }

    #[test]
    fn test_rfc3339_strings_become_timestamps() {
        let fields = map(&[("due", json!("2024-09-01T00:00:00Z"))]);
        let wire = to_firestore_fields(&fields);
        assert_eq!(wire["due"], json!({"timestampValue": "2024-09-01T00:00:00Z"}));

        let back = from_firestore_fields(&wire);
        assert_eq!(back["due"], json!("2024-09-01T00:00:00Z"));
    }

    #[test]
    fn test_plain_strings_stay_strings() {
        let fields = map(&[("name", json!("Pilot"))]);
        let wire = to_firestore_fields(&fields);
        assert_eq!(wire["name"], json!({"stringValue": "Pilot"}));
    }

    #[test]
    fn test_nested_round_trip() {
        let fields = map(&[(
            "meta",
            json!({"tags": ["a", "b"], "depth": 2}),
        )]);

        let wire = to_firestore_fields(&fields);
        let back = from_firestore_fields(&wire);
        assert_eq!(back, fields);
    }

    #[test]
    fn test_large_integers_survive() {
        let fields = map(&[("amount", json!(37_485_000_i64))]);
        let wire = to_firestore_fields(&fields);
        assert_eq!(wire["amount"], json!({"integerValue": "37485000"}));
        let back = from_firestore_fields(&wire);
        assert_eq!(back["amount"], json!(37_485_000_i64));
    }
}

//! Deterministic `application/x-www-form-urlencoded` serialization.
//!
//! Keys are emitted in ascending order. Scalars encode as their text form,
//! booleans as `1`/`0`, `null` is omitted, arrays and objects expand to
//! bracketed keys (`tags[0]=a`, `author[id]=1`).
//!
//! Escaping matches PHP's `http_build_query`: only `-`, `_` and `.` stay
//! literal, so `*` is sent as `%2A` (the WHATWG form serializer leaves it bare).

use std::collections::BTreeMap;

use serde_json::Value;
use url::form_urlencoded::Serializer;

/// Parameter map in wire order.
pub type Params = BTreeMap<String, Value>;

/// Encode parameters as a form-urlencoded string.
pub fn build_query(params: &Params) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in params {
        append_value(&mut serializer, key, value);
    }
    serializer.finish().replace('*', "%2A")
}

fn append_value(serializer: &mut Serializer<'_, String>, key: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            serializer.append_pair(key, if *b { "1" } else { "0" });
        }
        Value::Number(n) => {
            serializer.append_pair(key, &n.to_string());
        }
        Value::String(s) => {
            serializer.append_pair(key, s);
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                append_value(serializer, &format!("{key}[{i}]"), item);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                append_value(serializer, &format!("{key}[{name}]"), item);
            }
        }
    }
}

/// Whether a value counts as present for body selection (`data` handling).
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

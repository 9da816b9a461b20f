//! Encoding rules for the raw strings kept under a storage key.
//!
//! Records are JSON text, except that non-collection scalars are written in
//! their plain text form (a string value is stored without quotes). Reads
//! accept both and fall back to the raw string when the text is not JSON.

use serde_json::{Map, Value};

/// Treat an empty stored string the same as a missing record.
pub fn present(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

/// Parse a stored record, keeping the raw text when it is not JSON.
pub fn parse_lenient(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Encode a value the way a single (non-collection) record is stored:
/// strings raw, numbers and booleans as text, everything else as JSON.
pub fn encode_single(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// JavaScript truthiness. Empty arrays and objects are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce an identifier with `parseInt` rules: numbers truncate, strings
/// yield their leading signed digits (hex after a `0x` prefix), anything
/// else has no integer value.
pub fn coerce_identifier(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = rest.find(|c: char| !c.is_digit(radix)).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    i64::from_str_radix(&rest[..end], radix).ok().map(|n| sign * n)
}

/// Largest coerced identifier in a collection. `None` when the collection is
/// empty or any item lacks a numeric identifier.
pub fn max_identifier(items: &[Value], id_key: &str) -> Option<i64> {
    let mut max: Option<i64> = None;
    for item in items {
        let id = coerce_identifier(item.get(id_key))?;
        max = Some(max.map_or(id, |m| m.max(id)));
    }
    max
}

/// Object-spread a value: objects copy their fields, arrays and strings
/// contribute index keys, other scalars contribute nothing.
pub fn spread_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::String(c.to_string())))
            .collect(),
        _ => Map::new(),
    }
}

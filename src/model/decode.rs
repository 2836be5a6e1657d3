//! Shape-tolerant readers over `serde_json::Value`.
//!
//! Producers emit the same schema.org property as a bare scalar, an object,
//! or an array of either. These helpers reduce all of those to plain Rust
//! values so the wrapper types can share one decoding path.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use html_escape::decode_html_entities;
use serde_json::Value;

/// Decode entities until nothing changes, so `&amp;amp;amp;` ends up as `&`.
pub(crate) fn decode_html_symbols(text: &str) -> String {
    let mut decoded = text.to_string();
    // Every decoded entity is shorter than its source, so this terminates
    loop {
        let next = decode_html_entities(&decoded).into_owned();
        if next == decoded {
            return decoded;
        }
        decoded = next;
    }
}

/// Entity-decoded, trimmed text.
pub(crate) fn clean_text(text: &str) -> String {
    decode_html_symbols(text).trim().to_string()
}

/// First non-empty text reachable from `value`.
///
/// Strings and numbers are read directly, arrays yield their first usable
/// element, and objects are probed with `keys` in order.
pub(crate) fn text_of(value: &Value, keys: &[&str]) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(|item| text_of(item, keys)),
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| text_of(v, keys))),
        _ => None,
    }
}

/// Every non-empty text reachable from `value`, in order.
pub(crate) fn texts_of(value: &Value, keys: &[&str]) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(|item| texts_of(item, keys)).collect(),
        other => text_of(other, keys).into_iter().collect(),
    }
}

/// The leading integer of a number or numeric-looking string.
pub(crate) fn integer_of(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => leading_integer(s),
        Value::Array(items) => items.iter().find_map(integer_of),
        Value::Object(map) => ["value", "maxValue", "minValue"]
            .iter()
            .find_map(|key| map.get(*key).and_then(integer_of)),
        _ => None,
    }
}

/// First run of ASCII digits in `s`, e.g. `"6 servings"` -> 6.
pub(crate) fn leading_integer(s: &str) -> Option<u16> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// The `@type` of a node as a list of names, accepting a string or an array.
pub(crate) fn type_names(value: &Value) -> Vec<&str> {
    match value.get("@type") {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn has_type(value: &Value, name: &str) -> bool {
    type_names(value)
        .iter()
        .any(|t| t.rsplit('/').next().unwrap_or(t).eq_ignore_ascii_case(name))
}

/// Author names from a string, a Person/Organization, or an array of either.
pub(crate) fn author_of(value: &Value) -> Option<String> {
    let names: Vec<String> = texts_of(value, &["name"])
        .into_iter()
        .map(|name| clean_text(&name))
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names.join(", "))
    }
}

/// An ISO-8601 date or date-time, kept verbatim when it parses.
pub(crate) fn date_of(value: &Value) -> Option<String> {
    let text = text_of(value, &["value", "@value"])?;
    is_iso_date(&text).then_some(text)
}

fn is_iso_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z").is_ok()
        || DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

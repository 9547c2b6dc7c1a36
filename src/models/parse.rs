//! Field extraction helpers shared by the model mappers

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::{GiphyError, GiphyResult};

/// Timestamp format used by the API
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Required string field
pub fn required_str(json: &Value, key: &str, what: &str) -> GiphyResult<String> {
    json.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GiphyError::Mapping(format!("couldn't map {what}: missing `{key}`")))
}

/// Optional string field; non-strings read as absent
pub fn opt_string(json: &Value, key: &str) -> Option<String> {
    json.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Optional boolean field
pub fn opt_bool(json: &Value, key: &str) -> Option<bool> {
    json.get(key).and_then(Value::as_bool)
}

/// Optional unsigned number that may arrive as a JSON number or a numeric string
pub fn opt_u64(json: &Value, key: &str) -> Option<u64> {
    match json.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Like [`opt_u64`], narrowed to `u32`
pub fn opt_u32(json: &Value, key: &str) -> Option<u32> {
    opt_u64(json, key).and_then(|n| u32::try_from(n).ok())
}

/// Optional timestamp; unparseable values (including `0000-00-00 00:00:00`) read as absent
pub fn opt_date(json: &Value, key: &str) -> Option<NaiveDateTime> {
    json.get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_FORMAT).ok())
}

/// Optional array of strings; non-string entries are skipped
pub fn string_list(json: &Value, key: &str) -> Vec<String> {
    json.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Optional object field
pub fn opt_object<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    json.get(key).filter(|v| v.is_object())
}

//! Response envelope decoding
//!
//! Every API response body is a JSON object carrying a mandatory `meta` block:
//!
//! ```json
//! { "data": [...], "pagination": {...}, "meta": {"status": 200, "msg": "OK", "response_id": "..."} }
//! ```
//!
//! [`decode_envelope`] validates the body shape; [`check_response`] combines it
//! with the HTTP status to decide between success, API error, HTTP error and
//! structural failure.

use crate::error::GiphyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Decoded `meta` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Unique response id
    pub response_id: String,
    /// API-level status (200, 404, ...)
    pub status: u16,
    /// Status message
    pub message: String,
}

impl Envelope {
    /// Map a `meta` object; all three fields are required
    pub fn from_json(meta: &Value) -> Result<Self, DecodeError> {
        let response_id = meta
            .get("response_id")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingEnvelope("meta.response_id".into()))?;
        let status = meta
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .ok_or_else(|| DecodeError::MissingEnvelope("meta.status".into()))?;
        let message = meta
            .get("msg")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::MissingEnvelope("meta.msg".into()))?;

        Ok(Self {
            response_id: response_id.to_string(),
            status,
            message: message.to_string(),
        })
    }

    /// Whether the API reported success
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Decoded `pagination` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of results available
    pub total_count: u32,
    /// Number of results in this page
    pub count: u32,
    /// Offset of this page
    pub offset: u32,
}

impl Pagination {
    /// Map a `pagination` object. `count` is required; `total_count`
    /// defaults to `count` and `offset` to 0. Values that don't fit a `u32`
    /// are rejected rather than truncated.
    pub fn from_json(value: &Value) -> Result<Self, GiphyError> {
        let field = |name: &str| -> Result<Option<u32>, GiphyError> {
            match value.get(name).and_then(Value::as_u64) {
                Some(v) => u32::try_from(v).map(Some).map_err(|_| {
                    GiphyError::Mapping(format!("pagination {name} out of range: {v}"))
                }),
                None => Ok(None),
            }
        };
        let count = field("count")?
            .ok_or_else(|| GiphyError::Mapping(format!("couldn't map pagination from {value}")))?;
        let total_count = field("total_count")?.unwrap_or(count);
        let offset = field("offset")?.unwrap_or(0);

        Ok(Self {
            total_count,
            count,
            offset,
        })
    }

    /// Pagination for endpoints that return a bare list
    pub fn synthesized(count: usize, offset: u32) -> Self {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        Self {
            total_count: offset.saturating_add(count),
            count,
            offset,
        }
    }
}

/// One decoded page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Paging metadata
    pub pagination: Pagination,
    /// Envelope of the response that produced this page
    pub meta: Envelope,
}

/// Structural decode failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not JSON, or not a JSON object
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No `meta` or incomplete `meta`
    #[error("missing envelope: {0}")]
    MissingEnvelope(String),
}

impl From<DecodeError> for GiphyError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Malformed(msg) => GiphyError::MalformedResponse(msg),
            DecodeError::MissingEnvelope(msg) => GiphyError::MissingEnvelope(msg),
        }
    }
}

/// Decode the envelope of a response body, returning it with the parsed root object
pub fn decode_envelope(bytes: &[u8]) -> Result<(Envelope, Value), DecodeError> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    if !root.is_object() {
        return Err(DecodeError::Malformed(format!(
            "expected a JSON object, got {}",
            json_type_name(&root)
        )));
    }

    let meta = root
        .get("meta")
        .ok_or_else(|| DecodeError::MissingEnvelope("no meta field".into()))?;
    let envelope = Envelope::from_json(meta)?;

    Ok((envelope, root))
}

/// Resolve a completed HTTP exchange into a valid envelope + body, or an error.
///
/// The envelope status wins over the HTTP status when both are present; either
/// being non-200 is an API error carrying `meta.msg`.
pub fn check_response(http_status: u16, bytes: &[u8]) -> Result<(Envelope, Value), GiphyError> {
    let (envelope, root) = match decode_envelope(bytes) {
        Ok(decoded) => decoded,
        Err(_) if http_status != 200 => {
            return Err(GiphyError::Http {
                status: http_status,
                message: http_reason(http_status, bytes),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if !envelope.is_ok() {
        return Err(GiphyError::Api {
            status: envelope.status,
            message: envelope.message,
        });
    }

    if http_status != 200 {
        return Err(GiphyError::Api {
            status: http_status,
            message: envelope.message,
        });
    }

    Ok((envelope, root))
}

fn http_reason(status: u16, bytes: &[u8]) -> String {
    // Error bodies are sometimes `{"message": "..."}` without an envelope
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_default()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

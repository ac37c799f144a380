//! Response mapping: decoded payload on success, typed error on failure.

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error_code::ErrorKind;
use crate::{Error, Result};

/// A completed HTTP exchange as seen by the mapper.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Reason phrase; the canonical phrase for `status` is used when absent.
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            reason: None,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.headers
            .get_all(CONTENT_TYPE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.to_ascii_lowercase().contains("application/json"))
    }

    pub fn reason_phrase(&self) -> String {
        if let Some(reason) = self.reason.as_deref().filter(|r| !r.is_empty()) {
            return reason.to_string();
        }
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", self.status))
    }
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body of a JSON-typed response.
    Json(Value),
    /// Body of any other response, unmodified.
    Raw(Bytes),
}

impl Payload {
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Raw(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Payload::Raw(b) => Some(b),
            Payload::Json(_) => None,
        }
    }

    /// Deserialize a JSON payload into a typed value.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Json(v) => Ok(serde_json::from_value(v)?),
            Payload::Raw(_) => Err(Error::runtime("response is not JSON")),
        }
    }
}

/// Map a completed exchange to its payload or error.
///
/// Failure statuses carry the `error.message` of a JSON body, or the reason
/// phrase for other content types. A JSON error body without a message maps
/// to [`ErrorKind::Runtime`].
pub fn map_response(response: RawResponse) -> Result<Payload> {
    let is_json = response.is_json();

    if response.status < 400 {
        if !is_json {
            return Ok(Payload::Raw(response.body));
        }
        return Ok(Payload::Json(decode_json(&response.body)?));
    }

    if !is_json {
        let kind = ErrorKind::from_http_status(response.status);
        return Err(Error::api(response.status, kind, response.reason_phrase()));
    }

    let body = decode_json(&response.body)?;
    match body.pointer("/error/message").and_then(Value::as_str) {
        Some(message) => Err(Error::api(
            response.status,
            ErrorKind::from_http_status(response.status),
            message,
        )),
        None => Err(Error::api(
            response.status,
            ErrorKind::Runtime,
            response.reason_phrase(),
        )),
    }
}

fn decode_json(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

//! Transport-level request built for one operation.
//!
//! `ApiRequest` is plain data: the request factory produces it, an optional
//! auth provider rewrites it, and a [`Transport`](crate::transport::Transport)
//! sends it. Nothing here touches the network.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::{Error, ErrorContext, Result};

/// Body of an outgoing request. At most one body kind is set per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` parameters.
    Form(String),
    /// Serialized JSON payload.
    Json(String),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(s) | RequestBody::Json(s) => Some(s),
        }
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
            RequestBody::Json(_) => Some("application/json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Query string without the leading `?`; empty when absent.
    pub fn query(&self) -> &str {
        self.url.query().unwrap_or("")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_str(&self) -> Option<&str> {
        self.body.as_str()
    }

    /// Replace the query string. An empty string removes it.
    pub fn set_query(&mut self, query: &str) {
        if query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(query));
        }
    }

    /// Append one encoded pair to the query string.
    pub fn append_query_pair(&mut self, key: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(key, value);
    }

    /// Set a header, replacing previous values.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::implementation_with_context(
                "Invalid header name",
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(e.to_string()),
            )
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::implementation_with_context(
                "Invalid header value",
                ErrorContext::new()
                    .with_field_path(name.as_str())
                    .with_details(e.to_string()),
            )
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attach a body and its matching `Content-Type`.
    pub(crate) fn set_body(&mut self, body: RequestBody) {
        if let Some(ct) = body.content_type() {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        self.body = body;
    }
}

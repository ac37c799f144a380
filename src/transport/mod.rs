//! Transport boundary: sends an [`ApiRequest`] and hands back the raw response.
//!
//! Failure statuses are data here, not errors. Only exchanges that did not
//! complete (DNS, refused connection, timeout, broken body) produce a
//! [`TransportError`].

mod http;

pub use http::HttpTransport;

use std::time::Duration;

use async_trait::async_trait;

use crate::request::ApiRequest;
use crate::response::RawResponse;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: ApiRequest,
        timeout: Duration,
    ) -> std::result::Result<RawResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Other(String),
}

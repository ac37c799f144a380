//! Client-lifetime configuration shared by every operation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::auth::AuthProvider;
use crate::env::{Clock, Environment, ProcessEnvironment, SystemClock};
use crate::query::Params;
use crate::{Error, ErrorContext, Result};

/// Transport timeout used when neither the builder nor the environment sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parameter names that always travel in the query string.
pub const DEFAULT_FORCE_GET_PARAMS: &[&str] = &["client_id", "action", "access_token"];

/// Immutable for the duration of an operation; clients replace it copy-on-write.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_uri: Url,
    pub auth_provider: Option<Arc<dyn AuthProvider>>,
    /// Merged underneath per-operation parameters.
    pub default_params: Params,
    pub force_get_params: Vec<String>,
    pub timeout: Duration,
    pub clock: Arc<dyn Clock>,
    pub environment: Arc<dyn Environment>,
}

impl ClientConfig {
    pub fn new(base_uri: &str) -> Result<Self> {
        let base_uri = Url::parse(base_uri).map_err(|e| {
            Error::implementation_with_context(
                "Invalid base URI",
                ErrorContext::new()
                    .with_field_path("base_uri")
                    .with_details(format!("{base_uri}: {e}"))
                    .with_source("config"),
            )
        })?;
        if base_uri.cannot_be_a_base() {
            return Err(Error::implementation_with_context(
                "Invalid base URI",
                ErrorContext::new()
                    .with_field_path("base_uri")
                    .with_details(format!("{base_uri} cannot carry a path"))
                    .with_source("config"),
            ));
        }

        Ok(Self {
            base_uri,
            auth_provider: None,
            default_params: Params::new(),
            force_get_params: DEFAULT_FORCE_GET_PARAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeout: Duration::from_secs(timeout_from_env().unwrap_or(DEFAULT_TIMEOUT_SECS)),
            clock: Arc::new(SystemClock),
            environment: Arc::new(ProcessEnvironment),
        })
    }

    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }
}

/// `FLORA_HTTP_TIMEOUT_SECS`, when set to a positive integer.
fn timeout_from_env() -> Option<u64> {
    std::env::var("FLORA_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_uri", &self.base_uri.as_str())
            .field("auth_provider", &self.auth_provider.is_some())
            .field("default_params", &self.default_params)
            .field("force_get_params", &self.force_get_params)
            .field("timeout", &self.timeout)
            .finish()
    }
}

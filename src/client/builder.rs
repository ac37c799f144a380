use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::auth::AuthProvider;
use crate::client::core::FloraClient;
use crate::config::ClientConfig;
use crate::env::{Clock, Environment};
use crate::query::Params;
use crate::transport::{HttpTransport, Transport};
use crate::Result;

/// Builder for creating clients with custom configuration.
///
/// Everything except the base URI is optional:
/// - timeout defaults to 30 seconds, or `FLORA_HTTP_TIMEOUT_SECS` when set
/// - force-get parameters default to `client_id`, `action`, `access_token`
/// - the transport defaults to [`HttpTransport`]
pub struct FloraClientBuilder {
    base_uri: String,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    default_params: Params,
    force_get_params: Option<Vec<String>>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
    environment: Option<Arc<dyn Environment>>,
}

impl FloraClientBuilder {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            auth_provider: None,
            default_params: Params::new(),
            force_get_params: None,
            timeout: None,
            transport: None,
            clock: None,
            environment: None,
        }
    }

    /// Provider invoked for operations with `auth` set.
    pub fn auth_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    /// Parameters sent with every operation unless the operation sets them itself.
    pub fn default_params(mut self, params: Params) -> Self {
        self.default_params = params;
        self
    }

    pub fn default_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_params.insert(key.into(), value.into());
        self
    }

    /// Replace the parameter names that always travel in the query string.
    pub fn force_get_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.force_get_params = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom transport (mock servers, recording, alternative HTTP stacks).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn environment(mut self, environment: Arc<dyn Environment>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn build(self) -> Result<FloraClient> {
        let mut config = ClientConfig::new(&self.base_uri)?;
        config.auth_provider = self.auth_provider;
        config.default_params = self.default_params;
        if let Some(names) = self.force_get_params {
            config.force_get_params = names;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(clock) = self.clock {
            config.clock = clock;
        }
        if let Some(environment) = self.environment {
            config.environment = environment;
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };

        Ok(FloraClient {
            config: Arc::new(config),
            transport,
        })
    }
}

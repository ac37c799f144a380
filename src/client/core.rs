use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthProvider;
use crate::client::builder::FloraClientBuilder;
use crate::config::ClientConfig;
use crate::descriptor::OperationDescriptor;
use crate::factory::RequestFactory;
use crate::query::Params;
use crate::request::ApiRequest;
use crate::response::{map_response, Payload};
use crate::transport::Transport;
use crate::{Error, ErrorContext, Result};

/// Client for one Flora instance.
///
/// Cloning is cheap; clones share configuration and transport. Setters
/// replace the configuration copy-on-write, so operations already in flight
/// keep the configuration they started with.
#[derive(Clone)]
pub struct FloraClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl FloraClient {
    /// Client with default configuration and the reqwest transport.
    pub fn new(base_uri: &str) -> Result<Self> {
        FloraClientBuilder::new(base_uri).build()
    }

    pub fn builder(base_uri: impl Into<String>) -> FloraClientBuilder {
        FloraClientBuilder::new(base_uri)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_auth_provider(&mut self, provider: Arc<dyn AuthProvider>) -> &mut Self {
        Arc::make_mut(&mut self.config).auth_provider = Some(provider);
        self
    }

    pub fn set_default_params(&mut self, params: Params) -> &mut Self {
        Arc::make_mut(&mut self.config).default_params = params;
        self
    }

    pub fn set_force_get_params(&mut self, names: Vec<String>) -> &mut Self {
        Arc::make_mut(&mut self.config).force_get_params = names;
        self
    }

    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        Arc::make_mut(&mut self.config).timeout = timeout;
        self
    }

    /// Build the request an operation would send, without sending it.
    pub fn build_request(&self, op: &OperationDescriptor) -> Result<ApiRequest> {
        RequestFactory::new(&self.config).create(op)
    }

    /// Run one operation: build, send, map.
    pub async fn execute(&self, op: OperationDescriptor) -> Result<Payload> {
        let operation_id = Uuid::new_v4();
        let request = self.build_request(&op)?;
        let method = request.method.clone();
        let path = request.path().to_string();

        let start = Instant::now();
        let response = self
            .transport
            .send(request, self.config.timeout)
            .await
            .map_err(|e| {
                warn!(
                    operation_id = %operation_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "flora request failed"
                );
                Error::Transfer(e)
            })?;

        info!(
            operation_id = %operation_id,
            method = %method,
            path = %path,
            http_status = response.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flora request completed"
        );

        map_response(response)
    }

    /// Run one operation to completion on the calling thread.
    ///
    /// Starts a private current-thread runtime; calling this from inside an
    /// async runtime is rejected with a runtime error.
    pub fn execute_blocking(&self, op: OperationDescriptor) -> Result<Payload> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::runtime(
                "execute_blocking cannot be called from within an async runtime; use execute",
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::runtime_with_context(
                    "failed to start runtime",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("client"),
                )
            })?;
        runtime.block_on(self.execute(op))
    }
}

impl std::fmt::Debug for FloraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloraClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

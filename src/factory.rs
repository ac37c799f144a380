//! Request factory: turns an operation descriptor into an [`ApiRequest`].
//!
//! Building is synchronous and never touches the network. The rules, in order:
//!
//! 1. path `/{resource}/[{id}][.{format}]` below the base URI path
//! 2. `cache: false` adds `_=<unix seconds>`; `cache` itself is never sent,
//!    while `httpMethod` travels like any other parameter
//! 3. a nested `select` is stringified
//! 4. `action=retrieve` is dropped
//! 5. method: `httpMethod` > non-retrieve action (POST) > query longer than
//!    2000 characters (POST) > GET
//! 6. default parameters are merged underneath
//! 7. GET puts all parameters in the query; otherwise a non-empty `data`
//!    becomes a JSON body with the rest in the query, or the parameters become
//!    a form body with force-get parameters moved to the query
//! 8. `Referer` is set, then the auth provider runs if requested

use reqwest::header::{HeaderValue, REFERER};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::descriptor::{missing_resource, OperationDescriptor, RESERVED_KEYS};
use crate::env::sanitize_header_value;
use crate::query::{build_query, is_empty_value, Params};
use crate::request::{ApiRequest, RequestBody};
use crate::{Error, ErrorContext, Result};

/// Longest query string still sent with GET.
pub const MAX_GET_QUERY_LEN: usize = 2000;

const DEFAULT_ACTION: &str = "retrieve";

pub struct RequestFactory<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestFactory<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    pub fn create(&self, op: &OperationDescriptor) -> Result<ApiRequest> {
        if op.resource.is_empty() {
            return Err(missing_resource());
        }

        let url = self.resolve_url(op);
        let params = self.operation_params(op);
        let method = resolve_method(op, &params)?;

        let mut merged = self.config.default_params.clone();
        merged.extend(params);

        let mut request = ApiRequest::new(method, url);
        let referer = sanitize_header_value(&self.config.environment.referer());
        let referer = HeaderValue::from_str(&referer).map_err(|e| {
            Error::implementation_with_context(
                "Invalid referer",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("request_factory"),
            )
        })?;
        request.headers.insert(REFERER, referer);

        if !merged.is_empty() {
            apply_parameters(&mut request, merged, &self.config.force_get_params)?;
        }

        debug!(
            method = %request.method,
            path = request.path(),
            body = ?request.body.content_type(),
            "built request"
        );

        if op.auth {
            let provider = self.config.auth_provider.as_ref().ok_or_else(|| {
                Error::implementation_with_context(
                    "Auth provider is not configured",
                    ErrorContext::new()
                        .with_field_path("auth")
                        .with_source("request_factory"),
                )
            })?;
            debug!(resource = %op.resource, "authorizing request");
            request = provider.authorize(request)?;
        }

        Ok(request)
    }

    fn resolve_url(&self, op: &OperationDescriptor) -> Url {
        let mut path = self.config.base_uri.path().trim_end_matches('/').to_string();
        path.push('/');
        path.push_str(&op.resource);
        path.push('/');
        if let Some(id) = &op.id {
            path.push_str(&id.to_string());
        }
        if let Some(format) = &op.format {
            path.push('.');
            path.push_str(format);
        }

        let mut url = self.config.base_uri.clone();
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Parameters transmitted for this operation, before defaults are merged.
    fn operation_params(&self, op: &OperationDescriptor) -> Params {
        let mut params = Params::new();
        for (key, value) in &op.params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                warn!(key = %key, "ignoring generic parameter shadowing an operation field");
                continue;
            }
            params.insert(key.clone(), value.clone());
        }

        if op.cache == Some(false) {
            if params.contains_key("_") {
                warn!("caller-supplied `_` parameter is overwritten by the cache buster");
            }
            params.insert("_".to_string(), Value::from(self.config.clock.unix_timestamp()));
        }

        if let Some(method) = &op.http_method {
            params.insert("httpMethod".to_string(), Value::String(method.clone()));
        }

        if let Some(select) = &op.select {
            params.insert("select".to_string(), Value::String(select.to_param()));
        }

        if let Some(action) = op.action.as_deref().filter(|a| *a != DEFAULT_ACTION) {
            params.insert("action".to_string(), Value::String(action.to_string()));
        }

        if let Some(data) = &op.data {
            params.insert("data".to_string(), data.clone());
        }

        params
    }
}

fn resolve_method(op: &OperationDescriptor, params: &Params) -> Result<Method> {
    if let Some(explicit) = &op.http_method {
        return Method::from_bytes(explicit.to_uppercase().as_bytes()).map_err(|e| {
            Error::implementation_with_context(
                "Invalid HTTP method",
                ErrorContext::new()
                    .with_field_path("httpMethod")
                    .with_details(format!("{explicit}: {e}"))
                    .with_source("request_factory"),
            )
        });
    }

    if op.action.as_deref().is_some_and(|a| a != DEFAULT_ACTION) {
        return Ok(Method::POST);
    }

    if build_query(params).len() > MAX_GET_QUERY_LEN {
        return Ok(Method::POST);
    }

    Ok(Method::GET)
}

fn apply_parameters(
    request: &mut ApiRequest,
    mut params: Params,
    force_get_params: &[String],
) -> Result<()> {
    if request.method == Method::GET {
        request.set_query(&build_query(&params));
        return Ok(());
    }

    let has_data = params.get("data").is_some_and(|d| !is_empty_value(d));
    if has_data {
        let data = params.remove("data").unwrap_or(Value::Null);
        let body = serde_json::to_string(&data)?;
        request.set_query(&build_query(&params));
        request.set_body(RequestBody::Json(body));
        return Ok(());
    }

    let mut query = Params::new();
    for name in force_get_params {
        if params.get(name).is_some_and(|v| !v.is_null()) {
            if let Some(value) = params.remove(name) {
                query.insert(name.clone(), value);
            }
        }
    }
    request.set_query(&build_query(&query));
    request.set_body(RequestBody::Form(build_query(&params)));
    Ok(())
}

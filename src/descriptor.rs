//! Operation descriptors: what a single API call should do.
//!
//! A descriptor names the target resource and carries the known operation
//! keys as typed fields. Everything else (`filter`, `order`, `search`,
//! `limit`, `page`, custom parameters) lives in the open `params` map and is
//! forwarded as query or body parameters.
//!
//! Descriptors can be built with chained setters or converted from the loose
//! key/value form with [`OperationDescriptor::from_params`], which validates
//! the known keys.
//!
//! ```rust
//! use flora_client::OperationDescriptor;
//!
//! let op = OperationDescriptor::new("user")
//!     .id(1337)
//!     .select("id,firstname,lastname")
//!     .cache(false);
//! assert_eq!(op.resource, "user");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::select::Select;
use crate::{Error, ErrorContext, Result};

/// Keys represented by dedicated descriptor fields.
pub(crate) const RESERVED_KEYS: &[&str] = &[
    "resource",
    "id",
    "format",
    "action",
    "select",
    "cache",
    "auth",
    "authenticate",
    "httpMethod",
    "data",
];

/// Identifier of a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Int(i64::from(n))
    }
}

impl From<u32> for ItemId {
    fn from(n: u32) -> Self {
        ItemId::Int(i64::from(n))
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

/// One API operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationDescriptor {
    /// Target collection. Required and non-empty.
    pub resource: String,
    pub id: Option<ItemId>,
    /// Response format suffix (`json`, `image`, ...).
    pub format: Option<String>,
    /// Operation verb; `None` means `retrieve`.
    pub action: Option<String>,
    pub select: Option<Select>,
    /// `Some(false)` adds the `_` cache buster.
    pub cache: Option<bool>,
    /// Run the configured auth provider on the built request.
    pub auth: bool,
    /// Explicit HTTP method, overriding the computed one.
    pub http_method: Option<String>,
    /// JSON payload; a non-empty value forces a JSON body on POST.
    pub data: Option<Value>,
    /// Generic parameters.
    pub params: BTreeMap<String, Value>,
}

impl OperationDescriptor {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn select(mut self, select: impl Into<Select>) -> Self {
        self.select = Some(select.into());
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn auth(mut self, auth: bool) -> Self {
        self.auth = auth;
        self
    }

    pub fn http_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn filter(self, filter: impl Into<String>) -> Self {
        self.param("filter", filter.into())
    }

    pub fn order(self, order: impl Into<String>) -> Self {
        self.param("order", order.into())
    }

    pub fn search(self, search: impl Into<String>) -> Self {
        self.param("search", search.into())
    }

    pub fn limit(self, limit: u64) -> Self {
        self.param("limit", limit)
    }

    pub fn page(self, page: u64) -> Self {
        self.param("page", page)
    }

    /// Set a generic parameter. Keys with a dedicated setter are ignored at build time.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Convert the loose key/value form, validating the known keys.
    ///
    /// `authenticate` is accepted as a deprecated alias of `auth`. `null`
    /// values of known keys count as absent.
    pub fn from_params(params: Map<String, Value>) -> Result<Self> {
        let mut op = OperationDescriptor::default();
        let mut resource = None;

        for (key, value) in params {
            if value.is_null() && RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            match key.as_str() {
                "resource" => resource = Some(expect_string(&key, value)?),
                "id" => {
                    op.id = Some(match value {
                        Value::String(s) => ItemId::Str(s),
                        Value::Number(ref n) => match n.as_i64() {
                            Some(i) => ItemId::Int(i),
                            None => return Err(type_error(&key, "string or integer", &value)),
                        },
                        other => return Err(type_error(&key, "string or integer", &other)),
                    })
                }
                "format" => op.format = Some(expect_string(&key, value)?),
                "action" => op.action = Some(expect_string(&key, value)?),
                "select" => op.select = Some(Select::from_value(&value)?),
                "cache" => op.cache = Some(expect_bool(&key, value)?),
                "auth" => op.auth = op.auth || expect_bool(&key, value)?,
                "authenticate" => {
                    warn!("the `authenticate` parameter is deprecated, use `auth` instead");
                    op.auth = op.auth || expect_bool(&key, value)?;
                }
                "httpMethod" => op.http_method = Some(expect_string(&key, value)?),
                "data" => op.data = Some(value),
                _ => {
                    op.params.insert(key, value);
                }
            }
        }

        op.resource = match resource {
            Some(r) if !r.is_empty() => r,
            _ => return Err(missing_resource()),
        };
        Ok(op)
    }
}

pub(crate) fn missing_resource() -> Error {
    Error::implementation_with_context(
        "Resource must be set",
        ErrorContext::new()
            .with_field_path("resource")
            .with_source("descriptor"),
    )
}

fn expect_string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(type_error(key, "string", &other)),
    }
}

fn expect_bool(key: &str, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(type_error(key, "boolean", &other)),
    }
}

fn type_error(key: &str, expected: &str, actual: &Value) -> Error {
    Error::validation_with_context(
        format!("`{key}` must be a {expected}"),
        ErrorContext::new()
            .with_field_path(key)
            .with_details(format!("got {actual}"))
            .with_source("descriptor"),
    )
}

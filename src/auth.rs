//! Authentication extension point.
//!
//! The client never knows how credentials look. Operations that set the
//! `auth` flag hand their finished request to the configured
//! [`AuthProvider`], which returns the request carrying whatever it adds
//! (an `Authorization` header, an `access_token` query parameter, ...).
//!
//! Providers are shared by every operation of a client and may be called
//! concurrently from batch dispatch; implementations must be safe to call
//! from several tasks at once.
//!
//! ```rust
//! use flora_client::auth::AuthProvider;
//! use flora_client::request::ApiRequest;
//!
//! let bearer = |req: ApiRequest| req.with_header("Authorization", "Bearer x.y.z");
//! # let _: &dyn AuthProvider = &bearer;
//! ```

use crate::request::ApiRequest;
use crate::Result;

pub trait AuthProvider: Send + Sync {
    /// Return the request with credentials added. Errors reach the caller unchanged.
    fn authorize(&self, request: ApiRequest) -> Result<ApiRequest>;
}

impl<F> AuthProvider for F
where
    F: Fn(ApiRequest) -> Result<ApiRequest> + Send + Sync,
{
    fn authorize(&self, request: ApiRequest) -> Result<ApiRequest> {
        self(request)
    }
}

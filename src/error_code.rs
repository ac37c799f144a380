//! HTTP 状态错误分类：将失败状态码映射为可分支处理的错误种类。
//!
//! Status error kinds for completed exchanges.
//!
//! Every response with status `>= 400` is surfaced as exactly one
//! [`ErrorKind`]. Callers branch on the kind (e.g. to tell an
//! authentication failure apart from a missing item) instead of matching
//! raw status codes.
//!
//! | Status | Kind |
//! |--------|------|
//! | 400 | [`ErrorKind::BadRequest`] |
//! | 401 | [`ErrorKind::Unauthorized`] |
//! | 403 | [`ErrorKind::Forbidden`] |
//! | 404 | [`ErrorKind::NotFound`] |
//! | 500 | [`ErrorKind::Server`] |
//! | 502 | [`ErrorKind::BadGateway`] |
//! | 503 | [`ErrorKind::ServiceUnavailable`] |
//! | 504 | [`ErrorKind::GatewayTimeout`] |
//! | other | [`ErrorKind::Runtime`] |
//!
//! ## Example
//!
//! ```rust
//! use flora_client::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_http_status(404);
//! assert_eq!(kind, ErrorKind::NotFound);
//! assert_eq!(kind.name(), "not_found");
//! assert!(kind.is_client_error());
//! ```

use std::fmt;

/// Error kind of a failed HTTP exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400: the API rejected the request parameters
    BadRequest,
    /// 401: authentication required or credentials rejected
    Unauthorized,
    /// 403: authenticated but not allowed to access the item
    Forbidden,
    /// 404: resource or item does not exist
    NotFound,
    /// 500: internal server error
    Server,
    /// 502: upstream returned an invalid response
    BadGateway,
    /// 503: service temporarily unavailable
    ServiceUnavailable,
    /// 504: upstream did not answer in time
    GatewayTimeout,
    /// Any other failure status
    Runtime,
}

impl ErrorKind {
    /// Maps a failure status code to its kind. Unmapped codes yield [`ErrorKind::Runtime`].
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::Server,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            _ => Self::Runtime,
        }
    }

    /// Returns the snake_case name (e.g. `"not_found"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Server => "server",
            Self::BadGateway => "bad_gateway",
            Self::ServiceUnavailable => "service_unavailable",
            Self::GatewayTimeout => "gateway_timeout",
            Self::Runtime => "runtime",
        }
    }

    /// Returns whether this kind stems from a 4xx status.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest | Self::Unauthorized | Self::Forbidden | Self::NotFound
        )
    }

    /// Returns whether this kind stems from a 5xx status.
    #[inline]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Server | Self::BadGateway | Self::ServiceUnavailable | Self::GatewayTimeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use crate::error_code::ErrorKind;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Descriptor key or configuration field that caused the error (e.g. "resource", "cache")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g. expected type, actual value)
    pub details: Option<String>,
    /// Component that raised the error (e.g. "request_factory", "descriptor")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type of the Flora client.
///
/// Errors fall into four groups:
/// - caller mistakes found before any network I/O (`Implementation`, `Validation`)
/// - transport failures where no response arrived (`Transfer`)
/// - completed exchanges with a failure status (`Api`)
/// - encoding problems (`InvalidInput`, `Serialization`)
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}{}", format_context(.context))]
    Implementation {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransportError),

    #[error("{message}")]
    Api {
        status: u16,
        kind: ErrorKind,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a caller/programmer error with structured context
    pub fn implementation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Implementation {
            message: msg.into(),
            context,
        }
    }

    /// Create a caller/programmer error without context
    pub fn implementation(msg: impl Into<String>) -> Self {
        Self::implementation_with_context(msg, ErrorContext::new())
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::runtime_with_context(msg, ErrorContext::new())
    }

    /// Build the error for a completed exchange with a failure status.
    pub fn api(status: u16, kind: ErrorKind, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            kind,
            message: message.into(),
        }
    }

    /// Error kind of a failed HTTP exchange, if this error stems from one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of a failed exchange, if this error stems from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for errors raised before any network I/O because of caller mistakes.
    pub fn is_implementation(&self) -> bool {
        matches!(self, Error::Implementation { .. } | Error::Validation { .. })
    }

    /// True when the transport failed to complete the exchange.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Error::Transfer(_))
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Implementation { context, .. }
            | Error::Validation { context, .. }
            | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }
}

//! Clock and process environment used by the request factory.
//!
//! Both are injected so that request building stays deterministic in tests.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the cache-buster timestamp.
pub trait Clock: Send + Sync {
    /// Current Unix time in whole seconds.
    fn unix_timestamp(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> u64 {
        self.0
    }
}

/// Describes the invoking process for the `Referer` header.
pub trait Environment: Send + Sync {
    fn referer(&self) -> String;
}

/// `file://` followed by the command line of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn referer(&self) -> String {
        let args: Vec<String> = std::env::args().collect();
        format!("file://{}", args.join(" "))
    }
}

/// Constant referer, for embedding applications and tests.
#[derive(Debug, Clone)]
pub struct StaticEnvironment(pub String);

impl Environment for StaticEnvironment {
    fn referer(&self) -> String {
        self.0.clone()
    }
}

/// Drop characters a header value cannot carry.
pub(crate) fn sanitize_header_value(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

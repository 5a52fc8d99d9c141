// Request Descriptor - what a probe sends

use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const HEALTH_PATH: &str = "/healthz";
pub const PING_PATH: &str = "/api/v1/ping";
pub const SEARCH_PATH: &str = "/api/v1/tc/tickets/search";
pub const ORDER_PATH: &str = "/api/v1/tc/tickets/order";

/// HTTP method used by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request a probe issues against the API
///
/// The descriptor is transport-agnostic: the `HttpTransport` adapter turns
/// it into a real HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub timeout: Duration,
    /// Route through the configured search proxy (if any)
    pub via_proxy: bool,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
            timeout,
            via_proxy: false,
        }
    }

    pub fn post(path: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(body),
            timeout,
            via_proxy: false,
        }
    }

    pub fn with_proxy(mut self, via_proxy: bool) -> Self {
        self.via_proxy = via_proxy;
        self
    }

    /// Absolute URL for this request against `base_url`
    ///
    /// `base_url` is expected without a trailing slash (see `ProbeConfig`).
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path)
    }

    /// Timeout in whole milliseconds, saturating at `u64::MAX`
    pub fn timeout_millis(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

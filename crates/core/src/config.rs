// Probe configuration

use crate::domain::FlightId;
use crate::error::{AppError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// Environment fallbacks for the CLI flags
pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_SEARCH_PROXY: &str = "API_SEARCH_PROXY";
pub const ENV_FLIGHT_ID: &str = "API_FLIGHT_ID";

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const ORDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Per-probe request timeouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTimeouts {
    pub health: Duration,
    pub ping: Duration,
    pub search: Duration,
    pub order: Duration,
}

impl Default for ProbeTimeouts {
    fn default() -> Self {
        Self {
            health: HEALTH_TIMEOUT,
            ping: PING_TIMEOUT,
            search: SEARCH_TIMEOUT,
            order: ORDER_TIMEOUT,
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    base_url: String,
    pub timeouts: ProbeTimeouts,
    /// Proxy URL applied to the search request only
    pub search_proxy: Option<String>,
    /// Used for ordering only when search yields no flight id
    pub fallback_flight_id: Option<FlightId>,
}

impl ProbeConfig {
    /// Create a config for `base_url` (trailing slashes are dropped)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            timeouts: ProbeTimeouts::default(),
            search_proxy: None,
            fallback_flight_id: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_timeouts(mut self, timeouts: ProbeTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_search_proxy(mut self, proxy: Option<String>) -> Self {
        self.search_proxy = proxy.filter(|p| !p.trim().is_empty());
        self
    }

    /// # Errors
    /// - AppError::Config if `id` is empty
    pub fn with_fallback_flight_id(mut self, id: Option<String>) -> Result<Self> {
        self.fallback_flight_id = id
            .map(|id| {
                FlightId::new(id).map_err(|e| AppError::Config(format!("fallback flight id: {}", e)))
            })
            .transpose()?;
        Ok(self)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn normalize_base_url(url: String) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    trimmed.to_string()
}

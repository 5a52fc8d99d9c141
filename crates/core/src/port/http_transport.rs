// HTTP Transport Port
// Abstraction over the HTTP client so the runner can be tested without a network

use crate::domain::{HttpMethod, RequestDescriptor};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Status and undecoded body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// HTTP Transport trait
///
/// Implementations:
/// - ReqwestTransport (infra-http): real HTTP over reqwest
/// - mocks::MockTransport: scripted responses for tests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` to `url` and return the raw response
    ///
    /// Any HTTP status (including 4xx/5xx) is a successful exchange.
    ///
    /// # Errors
    /// - TransportError::Connect if the server cannot be reached
    /// - TransportError::Timeout if `request.timeout` elapses
    /// - TransportError::Body if the body cannot be read
    async fn send(
        &self,
        url: &str,
        request: &RequestDescriptor,
    ) -> Result<RawResponse, TransportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A request observed by `MockTransport`
    #[derive(Debug, Clone, PartialEq)]
    pub struct SentRequest {
        pub method: HttpMethod,
        pub url: String,
        pub body: Option<Value>,
        pub via_proxy: bool,
    }

    /// Mock HttpTransport with per-path scripted replies
    ///
    /// Paths without a script fail with `TransportError::Connect`, which
    /// mimics a server that is not running.
    pub struct MockTransport {
        replies: Mutex<HashMap<String, Result<RawResponse, TransportError>>>,
        sent: Mutex<Vec<SentRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                replies: Mutex::new(HashMap::new()),
                sent: Mutex::new(Vec::new()),
            }
        }

        /// Reply to every request on `path` with `status` and `body`
        pub fn respond(self, path: &str, status: u16, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(path.to_string(), Ok(RawResponse::new(status, body)));
            self
        }

        /// Fail every request on `path` with `error`
        pub fn fail(self, path: &str, error: TransportError) -> Self {
            self.replies
                .lock()
                .unwrap()
                .insert(path.to_string(), Err(error));
            self
        }

        pub fn sent(&self) -> Vec<SentRequest> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, path: &str) -> Vec<SentRequest> {
            self.sent()
                .into_iter()
                .filter(|req| req.url.ends_with(path))
                .collect()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(
            &self,
            url: &str,
            request: &RequestDescriptor,
        ) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push(SentRequest {
                method: request.method,
                url: url.to_string(),
                body: request.body.clone(),
                via_proxy: request.via_proxy,
            });

            self.replies
                .lock()
                .unwrap()
                .get(&request.path)
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Connect("connection refused".to_string())))
        }
    }
}

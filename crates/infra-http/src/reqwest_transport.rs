// HttpTransport implementation over reqwest
use async_trait::async_trait;
use flight_probe_core::domain::{HttpMethod, RequestDescriptor};
use flight_probe_core::port::{HttpTransport, RawResponse, TransportError};
use flight_probe_core::{AppError, Result};
use reqwest::{Client, ClientBuilder, Proxy};
use std::error::Error as StdError;
use tracing::debug;

const USER_AGENT: &str = concat!("flight-probe/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport
///
/// Holds a direct client and, when a search proxy is configured, a second
/// client routed through it. Requests flagged `via_proxy` use the proxied
/// client if there is one and the direct client otherwise.
pub struct ReqwestTransport {
    direct: Client,
    proxied: Option<Client>,
}

impl ReqwestTransport {
    /// Create a transport
    ///
    /// # Arguments
    /// * `search_proxy` - Proxy URL for requests flagged `via_proxy`
    /// * `system_proxy` - Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for direct requests
    ///
    /// # Errors
    /// - AppError::Config if the proxy URL is invalid or a client cannot be built
    pub fn new(search_proxy: Option<&str>, system_proxy: bool) -> Result<Self> {
        let mut direct = base_builder();
        if !system_proxy {
            direct = direct.no_proxy();
        }
        let direct = direct
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", error_chain(&e))))?;

        let proxied = match search_proxy {
            Some(url) => {
                let proxy = Proxy::all(url).map_err(|e| {
                    AppError::Config(format!("search proxy {}: {}", url, error_chain(&e)))
                })?;
                let client = base_builder().proxy(proxy).build().map_err(|e| {
                    AppError::Config(format!("proxied HTTP client: {}", error_chain(&e)))
                })?;
                Some(client)
            }
            None => None,
        };

        Ok(Self { direct, proxied })
    }

    pub fn has_search_proxy(&self) -> bool {
        self.proxied.is_some()
    }

    fn client_for(&self, request: &RequestDescriptor) -> &Client {
        match (&self.proxied, request.via_proxy) {
            (Some(proxied), true) => proxied,
            _ => &self.direct,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        url: &str,
        request: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportError> {
        let client = self.client_for(request);

        let mut builder = match request.method {
            HttpMethod::Get => client.get(url),
            HttpMethod::Post => client.post(url),
        }
        .timeout(request.timeout);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_send_error(&e, request))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout_millis())
            } else {
                TransportError::Body(error_chain(&e))
            }
        })?;

        debug!(url = %url, status = status, bytes = body.len(), "Response received");

        Ok(RawResponse { status, body })
    }
}

fn base_builder() -> ClientBuilder {
    Client::builder().user_agent(USER_AGENT)
}

fn map_send_error(e: &reqwest::Error, request: &RequestDescriptor) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(request.timeout_millis())
    } else if e.is_connect() {
        TransportError::Connect(error_chain(e))
    } else {
        TransportError::Request(error_chain(e))
    }
}

/// reqwest's Display omits the cause (e.g. "Connection refused"), so walk the chain
fn error_chain(e: &dyn StdError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// Probe Runner - sequential health/ping/search/order exchanges
use crate::application::render::{pretty_json, BANNER, SEPARATOR};
use crate::application::summary::{ProbeKind, ProbeOutcome, RunSummary};
use crate::config::ProbeConfig;
use crate::domain::{
    inspect_search_response, FlightId, OrderRequest, RequestDescriptor, ResponseBody,
    ResponseEnvelope, SearchQuery, SearchVerdict,
};
use crate::error::Result;
use crate::port::{HttpTransport, Reporter, Tone, TransportError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const SKIP_REASON: &str = "No valid flightId provided from search results.";

/// Runs the four API probes in order and reports every exchange
///
/// No probe failure is fatal: transport errors, non-JSON bodies and a
/// missing flight id all turn into diagnostics, and the next probe still runs.
pub struct ProbeRunner {
    config: ProbeConfig,
    transport: Arc<dyn HttpTransport>,
    reporter: Arc<dyn Reporter>,
}

impl ProbeRunner {
    /// Create a new runner
    ///
    /// # Example
    /// ```text
    /// let runner = ProbeRunner::new(
    ///     ProbeConfig::new("http://localhost:8080"),
    ///     Arc::new(ReqwestTransport::new(None, true)?),
    ///     Arc::new(ConsoleReporter),
    /// );
    /// let summary = runner.run().await;
    /// ```
    pub fn new(
        config: ProbeConfig,
        transport: Arc<dyn HttpTransport>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            transport,
            reporter,
        }
    }

    /// Run health, ping, search and order in sequence
    ///
    /// The flight id found by search (or the configured fallback) is handed
    /// unchanged to the order probe; without one, ordering is skipped.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        self.say(
            Tone::Heading,
            &format!(
                "Starting API tests against base URL: {}",
                self.config.base_url()
            ),
        );
        self.say(Tone::Heading, BANNER);

        summary.push(ProbeKind::Health, self.probe_health().await);
        summary.push(ProbeKind::Ping, self.probe_ping().await);

        self.say(
            Tone::Plain,
            "Attempting to search for flights to get a flightId for ordering...",
        );
        let (search_outcome, found) = self.probe_search().await;
        summary.push(ProbeKind::Search, search_outcome);

        let flight_id = match found {
            Some(id) => {
                self.say(
                    Tone::Success,
                    &format!("Found flightId: {}. Proceeding to order test.", id),
                );
                Some(id)
            }
            None => match &self.config.fallback_flight_id {
                Some(id) => {
                    self.say(
                        Tone::Warning,
                        &format!(
                            "Could not retrieve a flightId from search results. Using configured flightId: {}.",
                            id
                        ),
                    );
                    Some(id.clone())
                }
                None => {
                    self.say(
                        Tone::Warning,
                        "Could not retrieve a flightId from search results. Order test requires manual flightId.",
                    );
                    None
                }
            },
        };

        summary.push(ProbeKind::Order, self.probe_order(flight_id.as_ref()).await);
        summary.flight_id = flight_id;

        summary
    }

    /// Print the closing banner
    pub fn report_finished(&self) {
        self.say(Tone::Heading, BANNER);
        self.say(Tone::Success, "API tests finished.");
    }

    /// GET /healthz
    pub async fn probe_health(&self) -> ProbeOutcome {
        let request =
            RequestDescriptor::get(ProbeKind::Health.path(), self.config.timeouts.health);
        self.simple_probe(ProbeKind::Health, request).await
    }

    /// GET /api/v1/ping
    pub async fn probe_ping(&self) -> ProbeOutcome {
        let request = RequestDescriptor::get(ProbeKind::Ping.path(), self.config.timeouts.ping);
        self.simple_probe(ProbeKind::Ping, request).await
    }

    /// POST the example search query and extract the first flight id
    ///
    /// Returns the probe outcome and the flight id, which is `None` on any
    /// transport failure, non-JSON body, non-success code or empty result.
    pub async fn probe_search(&self) -> (ProbeOutcome, Option<FlightId>) {
        let request = match self.search_request() {
            Ok(request) => request,
            Err(e) => return (self.build_failed(ProbeKind::Search, e), None),
        };

        match self.exchange(&request).await {
            Ok(envelope) => {
                let flight_id = envelope
                    .json()
                    .and_then(|body| self.extract_flight_id(body));
                let outcome = responded(&envelope);
                info!(
                    probe = %ProbeKind::Search,
                    status = envelope.status,
                    flight_id = ?flight_id.as_ref().map(FlightId::as_str),
                    "Probe completed"
                );
                (outcome, flight_id)
            }
            Err(e) => (failed(ProbeKind::Search, &e), None),
        }
    }

    /// POST an example order for `flight_id`, or skip when there is none
    pub async fn probe_order(&self, flight_id: Option<&FlightId>) -> ProbeOutcome {
        let Some(flight_id) = flight_id else {
            let url = format!("{}{}", self.config.base_url(), ProbeKind::Order.path());
            info!(probe = %ProbeKind::Order, url = %url, "Probe skipped: no flight id");
            self.say(Tone::Warning, &format!("--- Skipping POST {} ---", url));
            self.say(Tone::Plain, &format!("Reason: {}", SKIP_REASON));
            self.say(Tone::Plain, SEPARATOR);
            return ProbeOutcome::Skipped {
                reason: SKIP_REASON.to_string(),
            };
        };

        let request = match self.order_request(flight_id) {
            Ok(request) => request,
            Err(e) => return self.build_failed(ProbeKind::Order, e),
        };
        self.simple_probe(ProbeKind::Order, request).await
    }

    fn search_request(&self) -> Result<RequestDescriptor> {
        let body = serde_json::to_value(SearchQuery::example())?;
        Ok(
            RequestDescriptor::post(ProbeKind::Search.path(), body, self.config.timeouts.search)
                .with_proxy(self.config.search_proxy.is_some()),
        )
    }

    fn order_request(&self, flight_id: &FlightId) -> Result<RequestDescriptor> {
        let body = serde_json::to_value(OrderRequest::example(flight_id.clone()))?;
        Ok(RequestDescriptor::post(
            ProbeKind::Order.path(),
            body,
            self.config.timeouts.order,
        ))
    }

    async fn simple_probe(&self, kind: ProbeKind, request: RequestDescriptor) -> ProbeOutcome {
        match self.exchange(&request).await {
            Ok(envelope) => {
                info!(
                    probe = %kind,
                    status = envelope.status,
                    json = envelope.is_json(),
                    "Probe completed"
                );
                responded(&envelope)
            }
            Err(e) => failed(kind, &e),
        }
    }

    /// Print the request, send it, print the response or the error
    async fn exchange(
        &self,
        request: &RequestDescriptor,
    ) -> std::result::Result<ResponseEnvelope, TransportError> {
        let url = request.url(self.config.base_url());
        self.say(
            Tone::Heading,
            &format!("--- Testing {} {} ---", request.method, url),
        );
        if let Some(body) = &request.body {
            self.say(Tone::Plain, "Request Body:");
            self.print_json(body);
        }

        debug!(
            method = %request.method,
            url = %url,
            timeout_ms = request.timeout_millis(),
            via_proxy = request.via_proxy,
            "Sending probe request"
        );

        match self.transport.send(&url, request).await {
            Ok(raw) => {
                let envelope = ResponseEnvelope::decode(raw.status, raw.body);
                self.print_response(&envelope);
                Ok(envelope)
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Probe request failed");
                self.say(Tone::Error, &format!("Error during request: {}", e));
                self.say(Tone::Plain, SEPARATOR);
                Err(e)
            }
        }
    }

    fn print_response(&self, envelope: &ResponseEnvelope) {
        let tone = match envelope.status {
            200..=299 => Tone::Success,
            400..=499 => Tone::Warning,
            500..=599 => Tone::Error,
            _ => Tone::Plain,
        };
        self.say(tone, &format!("Status Code: {}", envelope.status));

        match &envelope.body {
            ResponseBody::Json(value) => {
                self.say(Tone::Plain, "Response JSON:");
                self.print_json(value);
            }
            ResponseBody::Raw { text, decode_error } => {
                debug!(error = %decode_error, "Response body is not JSON");
                self.say(Tone::Plain, "Response Content (Not JSON):");
                self.say(Tone::Plain, text);
            }
        }
        self.say(Tone::Plain, SEPARATOR);
    }

    fn print_json(&self, value: &Value) {
        match pretty_json(value) {
            Ok(text) => self.say(Tone::Plain, &text),
            Err(e) => {
                self.say(Tone::Error, &format!("Payload is not JSON serializable: {}", e));
                self.say(Tone::Plain, &value.to_string());
            }
        }
    }

    fn extract_flight_id(&self, body: &Value) -> Option<FlightId> {
        match inspect_search_response(body) {
            Ok(SearchVerdict::Found(id)) => Some(id),
            Ok(SearchVerdict::NotSuccessful { code, message }) => {
                let code = code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "missing".to_string());
                let message = message.unwrap_or_default();
                info!(code = %code, message = %message, "Search did not succeed");
                self.say(
                    Tone::Warning,
                    &format!("Search did not succeed (code: {}) {}", code, message)
                        .trim_end()
                        .to_string(),
                );
                None
            }
            Ok(SearchVerdict::NoFlights) => {
                self.say(Tone::Warning, "Search succeeded but returned no flights.");
                None
            }
            Err(e) => {
                info!(error = %e, "Unusable search result");
                self.say(Tone::Warning, &format!("Unusable search result: {}", e));
                None
            }
        }
    }

    fn build_failed(&self, kind: ProbeKind, error: crate::AppError) -> ProbeOutcome {
        info!(probe = %kind, error = %error, "Failed to build probe request");
        self.say(
            Tone::Error,
            &format!("Failed to build {} request: {}", kind, error),
        );
        self.say(Tone::Plain, SEPARATOR);
        ProbeOutcome::Failed {
            reason: error.to_string(),
        }
    }

    fn say(&self, tone: Tone, text: &str) {
        self.reporter.line(tone, text);
    }
}

fn responded(envelope: &ResponseEnvelope) -> ProbeOutcome {
    ProbeOutcome::Responded {
        status: envelope.status,
        json: envelope.is_json(),
    }
}

fn failed(kind: ProbeKind, error: &TransportError) -> ProbeOutcome {
    info!(probe = %kind, error = %error, "Probe completed with transport failure");
    ProbeOutcome::Failed {
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::{HEALTH_PATH, ORDER_PATH, PING_PATH, SEARCH_PATH};
    use crate::domain::HttpMethod;
    use crate::port::http_transport::mocks::MockTransport;
    use crate::port::reporter::mocks::RecordingReporter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::Level;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn runner_with(
        transport: MockTransport,
        config: ProbeConfig,
    ) -> (ProbeRunner, Arc<MockTransport>, Arc<RecordingReporter>) {
        let transport = Arc::new(transport);
        let reporter = Arc::new(RecordingReporter::new());
        let runner = ProbeRunner::new(config, transport.clone(), reporter.clone());
        (runner, transport, reporter)
    }

    fn healthy_server() -> MockTransport {
        MockTransport::new()
            .respond(HEALTH_PATH, 200, r#"{"status":"ok"}"#)
            .respond(PING_PATH, 200, r#"{"message":"pong"}"#)
    }

    #[tokio::test]
    async fn test_full_run_threads_flight_id_into_order() {
        let transport = healthy_server()
            .respond(SEARCH_PATH, 200, r#"{"code":0,"data":[{"flightId":"F123"}]}"#)
            .respond(ORDER_PATH, 200, r#"{"success":true}"#);
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;

        assert_eq!(summary.flight_id.as_ref().map(FlightId::as_str), Some("F123"));
        let orders = transport.sent_to(ORDER_PATH);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].method, HttpMethod::Post);
        let body = orders[0].body.as_ref().unwrap();
        assert_eq!(body["flightId"], "F123");
        assert!(serde_json::to_string(body).unwrap().contains(r#""flightId":"F123""#));
        assert!(reporter.contains("Found flightId: F123. Proceeding to order test."));
        assert_eq!(
            summary.outcome(ProbeKind::Order),
            Some(&ProbeOutcome::Responded {
                status: 200,
                json: true
            })
        );
    }

    #[tokio::test]
    async fn test_every_probe_runs_when_server_is_down() {
        let (runner, transport, reporter) =
            runner_with(MockTransport::new(), ProbeConfig::default());

        let summary = runner.run().await;

        // health, ping, search attempted; order skipped without a request
        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].url.ends_with(HEALTH_PATH));
        assert!(sent[1].url.ends_with(PING_PATH));
        assert!(sent[2].url.ends_with(SEARCH_PATH));
        assert!(transport.sent_to(ORDER_PATH).is_empty());

        assert_eq!(summary.records.len(), 4);
        for kind in [ProbeKind::Health, ProbeKind::Ping, ProbeKind::Search] {
            assert_eq!(summary.outcome(kind).unwrap().label(), "failed");
        }
        assert!(summary.outcome(ProbeKind::Order).unwrap().is_skipped());
        assert!(reporter.contains("Error during request: Connection failed: connection refused"));
        assert!(reporter.contains("--- Skipping POST http://localhost:8080/api/v1/tc/tickets/order ---"));
    }

    #[tokio::test]
    async fn test_timeout_on_health_does_not_stop_ping() {
        let transport = MockTransport::new()
            .fail(HEALTH_PATH, TransportError::Timeout(5000))
            .respond(PING_PATH, 200, r#"{"message":"pong"}"#);
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let health = runner.probe_health().await;
        let ping = runner.probe_ping().await;

        assert!(matches!(health, ProbeOutcome::Failed { .. }));
        assert_eq!(
            ping,
            ProbeOutcome::Responded {
                status: 200,
                json: true
            }
        );
        assert_eq!(transport.sent().len(), 2);
        assert!(reporter.contains("Request timed out after 5000ms"));
    }

    #[tokio::test]
    async fn test_search_without_success_code_skips_order() {
        let transport = healthy_server().respond(
            SEARCH_PATH,
            200,
            r#"{"code":50001,"message":"upstream unavailable","data":[{"flightId":"F9"}]}"#,
        );
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;

        assert!(summary.flight_id.is_none());
        assert!(transport.sent_to(ORDER_PATH).is_empty());
        assert!(reporter.contains("Search did not succeed (code: 50001) upstream unavailable"));
        assert!(reporter.contains("Skipping POST"));
        assert!(reporter.contains("Reason: No valid flightId provided from search results."));
    }

    #[tokio::test]
    async fn test_search_with_empty_list_skips_order() {
        let transport = healthy_server().respond(SEARCH_PATH, 200, r#"{"code":0,"data":[]}"#);
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;

        assert!(summary.outcome(ProbeKind::Order).unwrap().is_skipped());
        assert!(transport.sent_to(ORDER_PATH).is_empty());
        assert!(reporter.contains("Search succeeded but returned no flights."));
    }

    #[tokio::test]
    async fn test_malformed_body_printed_raw() {
        let transport = MockTransport::new()
            .respond(HEALTH_PATH, 200, "OK")
            .respond(SEARCH_PATH, 502, "<html>Bad Gateway</html>");
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;

        assert_eq!(
            summary.outcome(ProbeKind::Health),
            Some(&ProbeOutcome::Responded {
                status: 200,
                json: false
            })
        );
        assert!(reporter.contains("Response Content (Not JSON):\nOK"));
        assert!(reporter.contains("Status Code: 502"));
        assert!(reporter.contains("<html>Bad Gateway</html>"));
        assert!(transport.sent_to(ORDER_PATH).is_empty());
    }

    #[tokio::test]
    async fn test_fallback_flight_id_used_when_search_fails() {
        let config = ProbeConfig::default()
            .with_fallback_flight_id(Some("MANUAL-7".to_string()))
            .unwrap();
        let transport = healthy_server().respond(ORDER_PATH, 201, r#"{"success":true}"#);
        let (runner, transport, reporter) = runner_with(transport, config);

        let summary = runner.run().await;

        let orders = transport.sent_to(ORDER_PATH);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].body.as_ref().unwrap()["flightId"], "MANUAL-7");
        assert_eq!(summary.flight_id.unwrap().as_str(), "MANUAL-7");
        assert!(reporter.contains("Using configured flightId: MANUAL-7."));
    }

    #[tokio::test]
    async fn test_search_flight_id_wins_over_fallback() {
        let config = ProbeConfig::default()
            .with_fallback_flight_id(Some("MANUAL-7".to_string()))
            .unwrap();
        let transport = healthy_server()
            .respond(SEARCH_PATH, 200, r#"{"code":0,"data":[{"flightId":"CA123-20251201"}]}"#)
            .respond(ORDER_PATH, 200, "{}");
        let (runner, transport, _reporter) = runner_with(transport, config);

        runner.run().await;

        let orders = transport.sent_to(ORDER_PATH);
        assert_eq!(orders[0].body.as_ref().unwrap()["flightId"], "CA123-20251201");
    }

    #[tokio::test]
    async fn test_search_routed_via_proxy_only_when_configured() {
        let transport = MockTransport::new()
            .respond(SEARCH_PATH, 200, r#"{"code":0,"data":[{"flightId":"F1"}]}"#);

        let (runner, transport, _) = runner_with(
            transport,
            ProbeConfig::default().with_search_proxy(Some("http://127.0.0.1:9000".to_string())),
        );
        let (_, flight_id) = runner.probe_search().await;
        runner.probe_order(flight_id.as_ref()).await;

        let sent = transport.sent();
        assert!(sent[0].via_proxy);
        assert!(!sent[1].via_proxy);
    }

    #[tokio::test]
    async fn test_request_transcript_format() {
        let transport = MockTransport::new().respond(SEARCH_PATH, 200, r#"{"code":0,"data":[]}"#);
        let mut config = ProbeConfig::new("http://api.test/");
        config.timeouts.search = Duration::from_millis(250);
        let (runner, _transport, reporter) = runner_with(transport, config);

        runner.probe_search().await;

        let transcript = reporter.transcript();
        assert!(transcript
            .starts_with("--- Testing POST http://api.test/api/v1/tc/tickets/search ---"));
        assert!(transcript.contains(
            "Request Body:\n{\n    \"from\": \"SHA\",\n    \"to\": \"PEK\",\n    \"date\": \"2025-12-01\"\n}"
        ));
        assert!(transcript.contains("Status Code: 200\nResponse JSON:"));
        assert!(transcript.contains(&format!(
            "{}\nSearch succeeded but returned no flights.",
            SEPARATOR
        )));
    }

    #[tokio::test]
    async fn test_order_payload_keeps_non_ascii() {
        let transport = MockTransport::new().respond(ORDER_PATH, 200, "{}");
        let (runner, _transport, reporter) = runner_with(transport, ProbeConfig::default());

        let id = FlightId::new("F123").unwrap();
        runner.probe_order(Some(&id)).await;

        assert!(reporter.contains("\"name\": \"测试乘客\""));
        assert!(reporter.contains("\"contactName\": \"测试联系人\""));
    }

    #[tokio::test]
    async fn test_report_finished_banner() {
        let (runner, _transport, reporter) =
            runner_with(MockTransport::new(), ProbeConfig::default());

        runner.report_finished();

        let lines = reporter.lines();
        assert_eq!(lines[0], (Tone::Heading, BANNER.to_string()));
        assert_eq!(lines[1].1, "API tests finished.");
    }

    #[tokio::test]
    async fn test_order_timeout_still_finishes_run() {
        let transport = healthy_server()
            .respond(SEARCH_PATH, 200, r#"{"code":0,"data":[{"flightId":"F123"}]}"#)
            .fail(ORDER_PATH, TransportError::Timeout(15000));
        let (runner, transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;
        runner.report_finished();

        assert_eq!(transport.sent_to(ORDER_PATH).len(), 1);
        assert_eq!(
            summary.outcome(ProbeKind::Order),
            Some(&ProbeOutcome::Failed {
                reason: "Request timed out after 15000ms".to_string()
            })
        );
        assert!(reporter.contains("Error during request: Request timed out after 15000ms"));
        assert!(reporter.transcript().ends_with("API tests finished."));
    }

    #[tokio::test]
    async fn test_order_server_error_printed_raw() {
        let transport = healthy_server()
            .respond(SEARCH_PATH, 200, r#"{"code":0,"data":[{"flightId":"F123"}]}"#)
            .respond(ORDER_PATH, 500, "Internal Server Error");
        let (runner, _transport, reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;
        runner.report_finished();

        assert_eq!(
            summary.outcome(ProbeKind::Order),
            Some(&ProbeOutcome::Responded {
                status: 500,
                json: false
            })
        );
        assert!(reporter.contains("Status Code: 500\nResponse Content (Not JSON):\nInternal Server Error"));
        assert!(reporter.transcript().ends_with("API tests finished."));
    }

    #[tokio::test]
    async fn test_failing_run_logs_nothing_at_warn() {
        let warnings = WarnCounter::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(warnings.clone()),
        );
        let transport = MockTransport::new()
            .fail(PING_PATH, TransportError::Timeout(5000))
            .respond(SEARCH_PATH, 200, r#"{"code":1,"message":"no"}"#);
        let (runner, _transport, _reporter) = runner_with(transport, ProbeConfig::default());

        let summary = runner.run().await;

        assert!(summary.outcome(ProbeKind::Order).unwrap().is_skipped());
        assert_eq!(warnings.count(), 0);
    }

    /// Counts events at WARN or above
    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl WarnCounter {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Default budget for a single upstream call.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Query parameters whose values are secrets and must never reach a log line.
const SECRET_PARAMS: [&str; 2] = ["token", "apikey"];

/// Outgoing GET issued by a provider adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
    /// Freshness hint: how long a cached copy of this response may be reused.
    pub max_age: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_age: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Attach a freshness hint, sent upstream as `Cache-Control: max-age=N`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self.with_header("cache-control", format!("max-age={}", max_age.as_secs()))
    }

    /// URL with secret query values masked, for logging.
    pub fn redacted_url(&self) -> String {
        redact_url(&self.url)
    }
}

/// Response returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level failure: nothing usable came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    timed_out: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport seam between provider adapters and the network.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("tickerboard/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .get(&request.url)
                .timeout(Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            // reqwest errors embed the URL; strip it so keys stay out of messages.
            let response = builder.send().await.map_err(|e| {
                let e = e.without_url();
                if e.is_timeout() {
                    HttpError::timeout(format!("request timeout after {}ms", request.timeout_ms))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {}", e.without_url())))?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Deterministic offline transport for tests and demos.
///
/// Requests are matched against registered URL fragments in registration
/// order; unmatched requests get a `404`. Every request is recorded.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Vec<ScriptedRoute>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[derive(Debug, Clone)]
struct ScriptedRoute {
    fragment: String,
    outcome: Result<HttpResponse, HttpError>,
    delay: Duration,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose URL contains `fragment` with `response`.
    pub fn respond(self, fragment: impl Into<String>, response: HttpResponse) -> Self {
        self.route(fragment, Ok(response), Duration::ZERO)
    }

    /// Like [`respond`](Self::respond), but only after `delay`.
    pub fn respond_after(
        self,
        fragment: impl Into<String>,
        response: HttpResponse,
        delay: Duration,
    ) -> Self {
        self.route(fragment, Ok(response), delay)
    }

    /// Fail requests whose URL contains `fragment` at the transport level.
    pub fn fail(self, fragment: impl Into<String>, error: HttpError) -> Self {
        self.route(fragment, Err(error), Duration::ZERO)
    }

    fn route(
        mut self,
        fragment: impl Into<String>,
        outcome: Result<HttpResponse, HttpError>,
        delay: Duration,
    ) -> Self {
        self.routes.push(ScriptedRoute {
            fragment: fragment.into(),
            outcome,
            delay,
        });
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let route = self
            .routes
            .iter()
            .find(|route| request.url.contains(&route.fragment))
            .cloned();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        Box::pin(async move {
            match route {
                Some(route) => {
                    if !route.delay.is_zero() {
                        tokio::time::sleep(route.delay).await;
                    }
                    route.outcome
                }
                None => Ok(HttpResponse::with_status(404, "{}")),
            }
        })
    }
}

fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };

    let pairs = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if SECRET_PARAMS.contains(&name.to_ascii_lowercase().as_str()) => {
                format!("{name}=***")
            }
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>();

    format!("{base}?{}", pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_hint_becomes_cache_control_header() {
        let request =
            HttpRequest::get("https://example.test/quote").with_max_age(Duration::from_secs(60));

        assert_eq!(request.max_age, Some(Duration::from_secs(60)));
        assert_eq!(
            request.headers.get("cache-control").map(String::as_str),
            Some("max-age=60")
        );
    }

    #[test]
    fn redaction_masks_only_secret_parameters() {
        let request = HttpRequest::get(
            "https://example.test/query?function=GLOBAL_QUOTE&symbol=SPY&apikey=s3cret",
        );
        assert_eq!(
            request.redacted_url(),
            "https://example.test/query?function=GLOBAL_QUOTE&symbol=SPY&apikey=***"
        );

        let request = HttpRequest::get("https://example.test/quote?symbol=AAPL&token=abc");
        assert!(!request.redacted_url().contains("abc"));
    }

    #[tokio::test]
    async fn scripted_client_matches_fragments_and_records_requests() {
        let client = ScriptedHttpClient::new()
            .respond("symbol=SPY", HttpResponse::ok_json("{\"ok\":true}"))
            .fail("symbol=QQQ", HttpError::new("connection reset"));

        let spy = client
            .execute(HttpRequest::get("https://x.test/query?symbol=SPY"))
            .await
            .expect("scripted success");
        assert_eq!(spy.body, "{\"ok\":true}");

        let qqq = client
            .execute(HttpRequest::get("https://x.test/query?symbol=QQQ"))
            .await
            .expect_err("scripted failure");
        assert_eq!(qqq.message(), "connection reset");

        let unknown = client
            .execute(HttpRequest::get("https://x.test/query?symbol=DIA"))
            .await
            .expect("unmatched routes still answer");
        assert_eq!(unknown.status, 404);

        assert_eq!(client.request_count(), 3);
    }
}

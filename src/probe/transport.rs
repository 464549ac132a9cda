//! HTTP transport layer.
//!
//! Builds the shared, connection-pooled `reqwest` client once per run and
//! exposes it to probe units behind the [`Transport`] trait so schedulers and
//! probers can be tested against canned or failing transports.

use crate::output;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Agent string sent when the user does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("sounder/", env!("CARGO_PKG_VERSION"));

/// Configuration for the shared HTTP client, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request duration ceiling.
    pub timeout: Duration,
    /// Whether to follow HTTP redirects.
    pub follow_redirects: bool,
    /// Redirect ceiling when following is enabled.
    pub max_redirects: usize,
    /// Raw "Name: Value" header specifications.
    pub headers: Vec<String>,
    /// Proxy URL applied to both HTTP and HTTPS traffic.
    pub proxy: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Custom User-Agent string.
    pub user_agent: Option<String>,
    /// Worker count, used to size the connection pool.
    pub concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            follow_redirects: false,
            max_redirects: 10,
            headers: Vec::new(),
            proxy: None,
            insecure: false,
            user_agent: None,
            concurrency: 50,
        }
    }
}

/// Classified transport failure for a single request.
///
/// The `Display` text of each variant is exactly what lands in a
/// [`ProbeResult`](crate::probe::ProbeResult)'s `error` field.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout { elapsed: Duration },

    #[error("Connection failed")]
    Connect { elapsed: Duration },

    #[error("Too many redirects")]
    TooManyRedirects { elapsed: Duration },

    #[error("Request error: {detail}")]
    Other { detail: String, elapsed: Duration },
}

impl TransportError {
    /// Time spent on the request before it failed.
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Timeout { elapsed }
            | Self::Connect { elapsed }
            | Self::TooManyRedirects { elapsed }
            | Self::Other { elapsed, .. } => *elapsed,
        }
    }

    fn classify(err: reqwest::Error, elapsed: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { elapsed }
        } else if err.is_redirect() {
            Self::TooManyRedirects { elapsed }
        } else if err.is_connect() {
            Self::Connect { elapsed }
        } else {
            Self::Other {
                detail: err.to_string(),
                elapsed,
            }
        }
    }
}

/// A fully-buffered HTTP response with its observed latency.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub elapsed: Duration,
}

impl RawResponse {
    /// Fetch a response header as a UTF-8 string.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }
}

/// Trait for the HTTP fetch seam.
///
/// Probe units and the scheduler only see this interface, so tests can
/// inject transports that fail, hang, or return canned responses.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET governed by the client-level timeout.
    async fn fetch(&self, url: &str) -> Result<RawResponse, TransportError>;

    /// Issue a GET with an explicit per-request timeout ceiling, used for
    /// short side-fetches like the favicon lookup.
    async fn fetch_with_timeout(
        &self,
        url: &str,
        ceiling: Duration,
    ) -> Result<RawResponse, TransportError>;
}

/// Production transport over a pooled `reqwest::Client`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the shared client from the run configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(redirect_limit(config)))
            .default_headers(build_default_headers(config))
            .pool_max_idle_per_host(config.concurrency.saturating_mul(2));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<RawResponse, TransportError> {
        let start = Instant::now();

        let response = request
            .send()
            .await
            .map_err(|err| TransportError::classify(err, start.elapsed()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::classify(err, start.elapsed()))?;

        Ok(RawResponse {
            status,
            headers,
            body: body.to_vec(),
            elapsed: start.elapsed(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.execute(self.client.get(url)).await
    }

    async fn fetch_with_timeout(
        &self,
        url: &str,
        ceiling: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.execute(self.client.get(url).timeout(ceiling)).await
    }
}

/// Redirect ceiling for the client.
///
/// When following is disabled, one hop stays allowed so plain-HTTP targets
/// can still upgrade to HTTPS.
fn redirect_limit(config: &ClientConfig) -> usize {
    if config.follow_redirects {
        config.max_redirects
    } else {
        1
    }
}

fn build_default_headers(config: &ClientConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    if let Ok(value) = HeaderValue::from_str(agent) {
        headers.insert(USER_AGENT, value);
    }
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    // User-supplied headers override the defaults.
    for spec in &config.headers {
        match parse_header_spec(spec) {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => {
                output::print_warning(&format!("invalid header format '{}', skipping", spec));
                tracing::warn!(header = %spec, "skipping malformed header");
            }
        }
    }

    headers
}

/// Parse a "Name: Value" header specification.
fn parse_header_spec(spec: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = spec.split_once(':')?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).ok()?;
    let value = HeaderValue::from_str(value.trim()).ok()?;
    Some((name, value))
}

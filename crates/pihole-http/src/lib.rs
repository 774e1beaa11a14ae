// # HTTP Transport
//
// This crate provides the default `Transport` for the Pi-hole client,
// built on reqwest.
//
// ## Behavior
//
// - Per-request timeout (30 seconds by default)
// - Bounded retry: 5xx responses and timeout / connect / request errors are
//   retried up to `max_attempts` total attempts with exponential backoff
// - 4xx responses are returned as-is on the first attempt
//
// ## Security
//
// Legacy requests carry the API token in the query string and logout paths
// carry the session id, so only the redacted path is logged and reqwest
// errors are stripped of their URL before being surfaced.

use async_trait::async_trait;
use pihole_core::traits::{HttpRequest, HttpResponse, Method, Transport, redact_path};
use pihole_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default total attempts (initial try + retries)
const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default delay before the first retry
const DEFAULT_BASE_BACKOFF_MS: u64 = 200;

/// Serializable transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Delay before the first retry in milliseconds; doubles per retry
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_backoff_ms() -> u64 {
    DEFAULT_BASE_BACKOFF_MS
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
        }
    }
}

/// reqwest-backed transport with timeout and bounded retry
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpTransport {
    /// Start building a transport
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Transport with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Transport from serialized settings
    pub fn from_config(config: &HttpTransportConfig) -> Result<Self> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(config.base_backoff_ms))
            .build()
    }

    fn to_reqwest(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let attempts = self.max_attempts.max(1);
        let path = redact_path(request.url.path()).into_owned();

        for attempt in 1..=attempts {
            tracing::debug!(attempt, method = %request.method, %path, "sending HTTP request");

            match self.to_reqwest(&request).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() && attempt < attempts {
                        tracing::warn!(
                            attempt,
                            method = %request.method,
                            %path,
                            %status,
                            "server error, retrying"
                        );
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    let body = response
                        .bytes()
                        .await
                        .map_err(|e| Error::http(format!("failed to read response body: {}", e.without_url())))?;

                    return Ok(HttpResponse::new(status.as_u16(), body.to_vec()));
                }
                Err(err) => {
                    let err = err.without_url();

                    if attempt < attempts && should_retry_error(&err) {
                        tracing::warn!(
                            attempt,
                            method = %request.method,
                            %path,
                            error = %err,
                            "HTTP request failed, retrying"
                        );
                        self.sleep_with_backoff(attempt).await;
                        continue;
                    }

                    return Err(Error::http(format!("request failed: {}", err)));
                }
            }
        }

        Err(Error::http("transport exhausted retries without a result"))
    }
}

/// Builder for [`HttpTransport`]
#[derive(Debug)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    accept_invalid_certs: bool,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            accept_invalid_certs: false,
        }
    }
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts (initial try + retries), at least 1
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Accept self-signed certificates, as shipped by a default appliance
    /// install with HTTPS enabled
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpTransport {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

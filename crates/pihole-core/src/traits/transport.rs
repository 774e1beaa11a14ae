// # Transport Trait
//
// Defines the pluggable HTTP exchange the dispatcher submits requests to.
//
// ## Implementations
//
// - reqwest with bounded retry: `pihole-http` crate (default)
// - Test doubles: see `tests/common` in `pihole-core` and `pihole-client`
//
// Requests and responses are plain owned values so that a transport can be
// swapped without the dispatcher knowing which HTTP stack is underneath.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// HTTP methods used by the appliance API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formed outgoing request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL, including any query string
    pub url: Url,
    /// Headers in the order they were applied
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Look up a header value (case-insensitive name match)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a query parameter value
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// A response as returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response from a status code and raw body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    ///
    /// `context` names what is being decoded and ends up in the
    /// [`Error::Decode`] message on failure.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::decode(context, e))
    }
}

/// Trait for HTTP transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks; one
/// transport instance is shared by every request a client issues.
///
/// # Retries
///
/// A transport may retry transient failures internally. The dispatcher never
/// retries, and wraps whatever error the transport returns with the method
/// and target of the call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request/response exchange
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: Any response the server produced, including
    ///   non-success statuses
    /// - `Err(Error)`: The exchange itself failed (connection, timeout, I/O)
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

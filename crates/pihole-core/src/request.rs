//! Request construction
//!
//! Turns (method, target, credential, body) into a complete [`HttpRequest`]
//! for the configured API generation.

use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;
use crate::traits::{HttpRequest, Method, Target, WireAdapter};

/// Builds outgoing requests from static client settings
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    headers: Vec<(String, String)>,
    wire: Arc<dyn WireAdapter>,
}

impl RequestBuilder {
    /// Create a builder
    ///
    /// `base_url` must already be normalized (no trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
        wire: Arc<dyn WireAdapter>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            headers,
            wire,
        }
    }

    /// The wire adapter requests are shaped for
    pub fn wire(&self) -> &dyn WireAdapter {
        self.wire.as_ref()
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request
    ///
    /// Static headers are applied first, then the credential (if any), then
    /// `Content-Type: application/json` when a body is present, replacing any
    /// configured content type.
    pub fn build(
        &self,
        method: Method,
        target: &Target,
        credential: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpRequest> {
        let url = self.wire.url(&self.base_url, target)?;

        let mut request = HttpRequest {
            method,
            url,
            headers: self.headers.clone(),
            body: None,
        };

        if let Some(credential) = credential {
            self.wire.attach_credential(&mut request, credential);
        }

        if let Some(body) = body {
            request.body = Some(serde_json::to_vec(body)?);
            request
                .headers
                .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
            request
                .headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }

        Ok(request)
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("generation", &self.wire.generation())
            .finish()
    }
}

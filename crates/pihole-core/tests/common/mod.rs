//! Test doubles and common utilities for dispatch contract tests
//!
//! These transports stand in for the appliance without any networking and
//! count what the dispatcher sends them.

#![allow(dead_code)]

use pihole_core::error::{Error, Result};
use pihole_core::traits::{HttpRequest, HttpResponse, Method, Transport};
use pihole_core::wire::AUTH_HEADER;
use pihole_core::{ClientConfig, Credential, Dispatcher};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A transport that plays the appliance's login endpoint and echoes `{}`
/// for everything else
///
/// Each successful login issues a fresh session id: `sid-1`, `sid-2`, ...
pub struct ScriptedTransport {
    /// Number of `POST /api/auth` exchanges
    login_calls: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    /// Delay before answering a login, to widen race windows
    login_delay: Duration,
    /// Fixed login response (e.g. a rejection) instead of issuing sessions
    login_response: Option<HttpResponse>,
    /// Validity reported for issued sessions
    validity_secs: u64,
    /// Canned responses keyed by "METHOD path"
    routes: HashMap<String, HttpResponse>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            login_calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            login_delay: Duration::ZERO,
            login_response: None,
            validity_secs: 300,
            routes: HashMap::new(),
        }
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn with_login_response(mut self, response: HttpResponse) -> Self {
        self.login_response = Some(response);
        self
    }

    pub fn with_validity(mut self, validity_secs: u64) -> Self {
        self.validity_secs = validity_secs;
        self
    }

    pub fn with_route(mut self, method: Method, path: &str, response: HttpResponse) -> Self {
        self.routes.insert(format!("{} {}", method, path), response);
        self
    }

    /// Number of login exchanges observed
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// All requests observed
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than the login exchange
    pub fn non_login_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !is_login(r))
            .collect()
    }

    /// Session ids carried by non-login requests
    pub fn sids_seen(&self) -> Vec<Option<String>> {
        self.non_login_requests()
            .iter()
            .map(|r| r.header(AUTH_HEADER).map(str::to_string))
            .collect()
    }
}

fn is_login(request: &HttpRequest) -> bool {
    request.method == Method::Post && request.url.path() == "/api/auth"
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if is_login(&request) {
            let n = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.login_delay.is_zero() {
                tokio::time::sleep(self.login_delay).await;
            }
            if let Some(response) = &self.login_response {
                return Ok(response.clone());
            }
            return Ok(login_ok(&format!("sid-{}", n), self.validity_secs));
        }

        let key = format!("{} {}", request.method, request.url.path());
        Ok(self
            .routes
            .get(&key)
            .cloned()
            .unwrap_or_else(|| HttpResponse::new(200, "{}")))
    }
}

/// A transport whose every exchange fails
pub struct FailingTransport {
    calls: Arc<AtomicUsize>,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for FailingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::http("connection refused"))
    }
}

/// Successful login response body
pub fn login_ok(sid: &str, validity_secs: u64) -> HttpResponse {
    HttpResponse::new(
        200,
        serde_json::json!({
            "session": {
                "valid": true,
                "totp": false,
                "sid": sid,
                "csrf": format!("csrf-{}", sid),
                "validity": validity_secs,
                "message": "password correct"
            },
            "took": 0.003
        })
        .to_string(),
    )
}

/// Dispatcher for the current API over the given transport
pub fn current_dispatcher(transport: Arc<dyn Transport>) -> Dispatcher {
    let config = ClientConfig::new("http://pi.hole/", Credential::password("correct horse"));
    Dispatcher::new(&config, transport).expect("valid config")
}

/// Dispatcher for the legacy API over the given transport
pub fn legacy_dispatcher(transport: Arc<dyn Transport>) -> Dispatcher {
    let config = ClientConfig::new(
        "http://pi.hole/admin/api.php",
        Credential::api_token("legacy-token"),
    );
    Dispatcher::new(&config, transport).expect("valid config")
}

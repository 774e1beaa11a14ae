//! Login and logout exchanges for the current API
//!
//! The authenticator only talks to the appliance; storing or clearing the
//! resulting session is up to the dispatcher, which does it under the
//! session store's exclusive lock.
//!
//! ## API Calls
//!
//! ```http
//! POST /api/auth
//! {"password": "..."}
//!
//! DELETE /api/auth/:sid
//! X-FTL-SID: <sid>
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dispatch::Dispatcher;
use crate::error::{AuthFailure, Error, Result};
use crate::session::Session;
use crate::traits::{HttpResponse, Method, Target};
use crate::wire::AUTH_PATH;

#[derive(Serialize)]
struct AuthRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    session: AuthSessionBody,
    #[serde(default)]
    error: Option<AuthErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSessionBody {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    totp: bool,
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    csrf: Option<String>,
    #[serde(default)]
    validity: i64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Performs the password exchange for a session
#[derive(Clone)]
pub struct Authenticator {
    /// ⚠️ NEVER log this value
    password: String,
}

impl Authenticator {
    /// Create an authenticator for a password
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Submit the password and return the issued session
    ///
    /// # Errors
    ///
    /// - [`AuthFailure::BadRequest`]: 4xx response, or 200 without a valid session
    /// - [`AuthFailure::TooManyRequests`]: 429 response
    /// - [`AuthFailure::UnexpectedStatus`]: any other non-success status
    /// - [`Error::Transport`]: the exchange itself failed
    pub async fn login(&self, dispatcher: &Dispatcher) -> Result<Session> {
        let body = serde_json::to_value(AuthRequest {
            password: &self.password,
        })?;

        let response = dispatcher
            .exchange(Method::Post, &Target::path(AUTH_PATH), None, Some(&body))
            .await?;

        let session = session_from_response(&response)?;
        tracing::info!(
            "Logged in to appliance (session valid for {}s)",
            session.validity_secs
        );
        Ok(session)
    }

    /// Delete the session `sid` on the appliance
    ///
    /// # Errors
    ///
    /// - [`AuthFailure::NotFound`]: the session is already gone
    /// - [`AuthFailure::Unauthorized`]: the request's own session is stale or forged
    /// - [`AuthFailure::UnexpectedStatus`]: any other status than 204
    pub async fn logout(&self, dispatcher: &Dispatcher, sid: &str) -> Result<()> {
        let target = Target::path(session_path(sid));
        let response = dispatcher.dispatch(Method::Delete, target, None).await?;

        match response.status() {
            204 => {
                tracing::info!("Session deleted on appliance");
                Ok(())
            }
            404 => Err(AuthFailure::NotFound(sid.to_string()).into()),
            401 => Err(AuthFailure::Unauthorized(sid.to_string()).into()),
            status => Err(AuthFailure::UnexpectedStatus {
                status,
                message: failure_message(&response),
            }
            .into()),
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Map a login response to a session or an authentication failure
fn session_from_response(response: &HttpResponse) -> Result<Session> {
    match response.status() {
        200 => {
            let parsed: AuthResponse = response.json("login response")?;
            let session = parsed.session;

            match session.sid.filter(|sid| !sid.is_empty()) {
                Some(sid) if session.valid => Ok(Session::issued(
                    sid,
                    session.csrf.unwrap_or_default(),
                    session.totp,
                    u64::try_from(session.validity).unwrap_or(0),
                    Utc::now(),
                )),
                _ => {
                    let message = session
                        .message
                        .unwrap_or_else(|| "appliance did not issue a valid session".to_string());
                    tracing::warn!("Login rejected: {}", message);
                    Err(AuthFailure::BadRequest(message).into())
                }
            }
        }
        429 => {
            tracing::warn!("Login rate limited by appliance");
            Err(AuthFailure::TooManyRequests(failure_message(response)).into())
        }
        status @ 400..=499 => {
            tracing::warn!("Login rejected with status {}", status);
            Err(AuthFailure::BadRequest(failure_message(response)).into())
        }
        status => Err(Error::Authentication(AuthFailure::UnexpectedStatus {
            status,
            message: failure_message(response),
        })),
    }
}

/// Best available message from an error response
///
/// Prefers `error.message`, then `session.message`, then the raw body.
fn failure_message(response: &HttpResponse) -> String {
    let parsed: AuthResponse = serde_json::from_slice(response.body()).unwrap_or_default();

    parsed
        .error
        .and_then(|error| error.message)
        .or(parsed.session.message)
        .unwrap_or_else(|| response.text())
}

/// `/api/auth/<sid>` with the id escaped as a single path segment
fn session_path(sid: &str) -> String {
    // form encoding writes spaces as '+', which is literal in a path
    let segment: String = url::form_urlencoded::byte_serialize(sid.as_bytes()).collect();
    format!("{}/{}", AUTH_PATH, segment.replace('+', "%20"))
}

// # Dispatcher
//
// The request-issuing facade every entity operation goes through.
//
// ## Responsibilities
//
// - Classify the target as public or authenticated (per wire adapter)
// - Obtain the credential: the static token (legacy API) or the cached
//   session, logging in lazily on first use or after expiry (current API)
// - Build the request and hand it to the transport
// - Wrap transport failures with the method and target of the call
//
// ## Non-responsibilities
//
// - ❌ Interpreting response bodies (each entity collaborator does that)
// - ❌ Retrying (owned by the transport, if at all)
// - ❌ Caching anything other than the session

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::config::{ApiGeneration, ClientConfig, Credential};
use crate::error::{AuthFailure, Error, Result};
use crate::request::RequestBuilder;
use crate::session::{Session, SessionStore};
use crate::traits::{HttpResponse, Method, Target, Transport};
use crate::wire;

/// How requests are authenticated
enum Auth {
    /// Current API: password exchanged for a cached session
    Session {
        authenticator: Authenticator,
        store: SessionStore,
    },
    /// Legacy API: static token on every request
    StaticToken(String),
}

/// Issues requests against the appliance on behalf of entity collaborators
pub struct Dispatcher {
    requests: RequestBuilder,
    transport: Arc<dyn Transport>,
    auth: Auth,
}

impl Dispatcher {
    /// Create a dispatcher
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientValidation`] if the configuration is invalid.
    /// No network activity happens here.
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let requests = RequestBuilder::new(
            config.normalized_base_url(),
            config.effective_headers(),
            wire::adapter_for(config.generation()),
        );

        let auth = match &config.credential {
            Credential::Password { password } => {
                let store = match &config.session_id {
                    Some(sid) => SessionStore::with_session(Session::restored(sid.clone())),
                    None => SessionStore::new(),
                };
                Auth::Session {
                    authenticator: Authenticator::new(password.clone()),
                    store,
                }
            }
            Credential::ApiToken { token } => Auth::StaticToken(token.clone()),
        };

        tracing::debug!(
            "Dispatcher created for {} ({:?} API)",
            requests.base_url(),
            config.generation()
        );

        Ok(Self {
            requests,
            transport,
            auth,
        })
    }

    /// API generation this dispatcher speaks
    pub fn generation(&self) -> ApiGeneration {
        self.requests.wire().generation()
    }

    /// Issue a request
    ///
    /// Logs in first when the target requires a session and none is cached.
    /// The response is returned as-is, whatever its status.
    ///
    /// # Errors
    ///
    /// - [`Error::ClientValidation`]: the target belongs to the other API generation
    /// - [`Error::Authentication`]: the lazy login failed; nothing was sent
    /// - [`Error::Transport`]: the exchange failed
    pub async fn dispatch(
        &self,
        method: Method,
        target: Target,
        body: Option<Value>,
    ) -> Result<HttpResponse> {
        let wire = self.requests.wire();
        if !wire.accepts(&target) {
            return Err(Error::validation(format!(
                "target {} is not valid for the {:?} API",
                target,
                wire.generation()
            )));
        }

        let credential = if wire.requires_auth(method, &target) {
            Some(self.credential().await?)
        } else {
            None
        };

        self.exchange(method, &target, credential.as_deref(), body.as_ref())
            .await
    }

    /// `GET` a path (current API)
    pub async fn get(&self, path: &str) -> Result<HttpResponse> {
        self.dispatch(Method::Get, Target::path(path), None).await
    }

    /// `POST` a JSON body to a path (current API)
    pub async fn post(&self, path: &str, body: Value) -> Result<HttpResponse> {
        self.dispatch(Method::Post, Target::path(path), Some(body))
            .await
    }

    /// `PUT` a path, optionally with a JSON body (current API)
    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<HttpResponse> {
        self.dispatch(Method::Put, Target::path(path), body).await
    }

    /// `DELETE` a path (current API)
    pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
        self.dispatch(Method::Delete, Target::path(path), None).await
    }

    /// `GET` the legacy endpoint with query parameters (legacy API)
    pub async fn query<K, V>(&self, params: impl IntoIterator<Item = (K, V)>) -> Result<HttpResponse>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.dispatch(Method::Get, Target::query(params), None).await
    }

    /// Log in and replace the cached session
    ///
    /// Runs under the session store's exclusive lock, so it is ordered with
    /// respect to lazy logins. On failure the previous session is kept.
    pub async fn login(&self) -> Result<Session> {
        let (authenticator, store) = self.session_auth()?;
        store.replace_with(|| authenticator.login(self)).await
    }

    /// Perform the login exchange without touching the cached session
    pub async fn create_session(&self) -> Result<Session> {
        let (authenticator, _) = self.session_auth()?;
        authenticator.login(self).await
    }

    /// Delete session `sid` on the appliance
    ///
    /// If `sid` is the cached session it is cleared once the appliance
    /// confirms deletion or reports it unknown.
    pub async fn logout(&self, sid: &str) -> Result<()> {
        let (authenticator, store) = self.session_auth()?;
        let result = authenticator.logout(self, sid).await;

        let invalidated = match &result {
            Ok(()) => true,
            Err(err) => matches!(err.auth_failure(), Some(AuthFailure::NotFound(_))),
        };
        if invalidated && store.clear_if(sid).await {
            tracing::debug!("Cleared cached session after logout");
        }

        result
    }

    /// Whether a valid session is cached (always false for the legacy API)
    pub async fn has_session(&self) -> bool {
        self.session_id().await.is_some()
    }

    /// Id of the cached session, if valid
    pub async fn session_id(&self) -> Option<String> {
        match &self.auth {
            Auth::Session { store, .. } => store.valid_sid().await,
            Auth::StaticToken(_) => None,
        }
    }

    /// Build and send a request with an explicit credential
    ///
    /// Used for the login exchange itself, which must not go through
    /// credential lookup.
    pub(crate) async fn exchange(
        &self,
        method: Method,
        target: &Target,
        credential: Option<&str>,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let request = self.requests.build(method, target, credential, body)?;

        tracing::debug!("Sending {} {}", method, target);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| Error::transport(method, target, e))?;

        tracing::debug!("{} {} -> {}", method, target, response.status());
        Ok(response)
    }

    /// Credential for an authenticated request
    async fn credential(&self) -> Result<String> {
        match &self.auth {
            Auth::StaticToken(token) => Ok(token.clone()),
            Auth::Session {
                authenticator,
                store,
            } => store
                .sid_or_login(|| async {
                    tracing::debug!("No valid session cached, logging in");
                    authenticator.login(self).await
                })
                .await,
        }
    }

    fn session_auth(&self) -> Result<(&Authenticator, &SessionStore)> {
        match &self.auth {
            Auth::Session {
                authenticator,
                store,
            } => Ok((authenticator, store)),
            Auth::StaticToken(_) => Err(Error::validation(
                "sessions are not available with the legacy API token",
            )),
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}

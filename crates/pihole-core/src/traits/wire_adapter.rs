// # Wire Adapter Trait
//
// The appliance speaks two incompatible API generations:
//
// - **Current**: REST-ish paths under `/api`, session id in the `X-FTL-SID`
//   header, session obtained by `POST /api/auth`.
// - **Legacy**: a single `api.php` endpoint driven by query parameters, with
//   a long-lived token passed as `auth=<token>`.
//
// A wire adapter captures everything that differs between them: which
// target shape is valid, which targets are public, how the URL is formed
// and where the credential goes. One adapter is chosen per client at
// construction time; the two are never mixed.

use std::borrow::Cow;
use std::fmt;
use url::Url;

use crate::config::ApiGeneration;
use crate::error::Result;
use crate::traits::transport::{HttpRequest, Method};

const SESSION_PATH_PREFIX: &str = "/api/auth/";

/// Path with any session id replaced by `<sid>`, safe to log
///
/// Logout requests address the session by id (`/api/auth/<sid>`), which is
/// a credential.
pub fn redact_path(path: &str) -> Cow<'_, str> {
    if path.starts_with(SESSION_PATH_PREFIX) && path.len() > SESSION_PATH_PREFIX.len() {
        Cow::Owned(format!("{}<sid>", SESSION_PATH_PREFIX))
    } else {
        Cow::Borrowed(path)
    }
}

/// Logical request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Path relative to the base URL (current API), e.g. `/api/auth`
    Path(String),
    /// Query parameters against the base URL (legacy API)
    Query(Vec<(String, String)>),
}

impl Target {
    /// Create a path target
    pub fn path(path: impl Into<String>) -> Self {
        Target::Path(path.into())
    }

    /// Create a query target from key/value pairs
    pub fn query<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Target::Query(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Path(path) => f.write_str(&redact_path(path)),
            Target::Query(params) => {
                f.write_str("?")?;
                for (i, (key, value)) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str("&")?;
                    }
                    if value.is_empty() {
                        write!(f, "{}", key)?;
                    } else {
                        write!(f, "{}={}", key, value)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Trait for API generation adapters
///
/// Implementations are stateless; the credential is supplied by the
/// dispatcher per request.
pub trait WireAdapter: Send + Sync {
    /// The API generation this adapter speaks
    fn generation(&self) -> ApiGeneration;

    /// Whether the target has the shape this generation uses
    fn accepts(&self, target: &Target) -> bool;

    /// Whether the request must carry a credential
    fn requires_auth(&self, method: Method, target: &Target) -> bool;

    /// Resolve the target against the base URL
    fn url(&self, base_url: &str, target: &Target) -> Result<Url>;

    /// Attach the credential to an otherwise complete request
    fn attach_credential(&self, request: &mut HttpRequest, credential: &str);
}

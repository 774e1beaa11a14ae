//! Configuration types for the Pi-hole client
//!
//! A client is configured once at construction and never changes afterwards.
//! The credential variant selects the API generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// `user-agent` sent unless the caller configures their own
pub const DEFAULT_USER_AGENT: &str = concat!("pihole-client/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the appliance base URL
pub const ENV_URL: &str = "PIHOLE_URL";
/// Environment variable holding the web password (current API)
pub const ENV_PASSWORD: &str = "PIHOLE_PASSWORD";
/// Environment variable holding the static API token (legacy API)
pub const ENV_API_TOKEN: &str = "PIHOLE_API_TOKEN";
/// Environment variable holding a pre-existing session id (current API)
pub const ENV_SESSION_ID: &str = "PIHOLE_SESSION_ID";

/// API generation spoken by a client instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiGeneration {
    /// Session-based REST API (`/api/...`)
    Current,
    /// Query-string `api.php` API with a static token
    Legacy,
}

/// Credential used to authenticate against the appliance
///
/// The two variants are mutually exclusive: a password implies the current
/// API, a static token implies the legacy API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credential {
    /// Web interface password, exchanged for a session
    Password {
        /// The password
        password: String,
    },

    /// Long-lived legacy API token
    ApiToken {
        /// The token
        token: String,
    },
}

impl Credential {
    /// Create a password credential
    pub fn password(password: impl Into<String>) -> Self {
        Credential::Password {
            password: password.into(),
        }
    }

    /// Create a legacy API token credential
    pub fn api_token(token: impl Into<String>) -> Self {
        Credential::ApiToken {
            token: token.into(),
        }
    }

    /// API generation this credential belongs to
    pub fn generation(&self) -> ApiGeneration {
        match self {
            Credential::Password { .. } => ApiGeneration::Current,
            Credential::ApiToken { .. } => ApiGeneration::Legacy,
        }
    }

    fn secret(&self) -> &str {
        match self {
            Credential::Password { password } => password,
            Credential::ApiToken { token } => token,
        }
    }
}

// Secrets never reach logs through Debug
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password { .. } => f
                .debug_struct("Password")
                .field("password", &"<REDACTED>")
                .finish(),
            Credential::ApiToken { .. } => f
                .debug_struct("ApiToken")
                .field("token", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Appliance base URL, e.g. `http://pi.hole` (current API) or
    /// `http://pi.hole/admin/api.php` (legacy API)
    pub base_url: String,

    /// Password or static token
    pub credential: Credential,

    /// Pre-existing session id to start with (current API only)
    #[serde(default)]
    pub session_id: Option<String>,

    /// Extra static headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Create a new configuration
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            base_url: base_url.into(),
            credential,
            session_id: None,
            headers: BTreeMap::new(),
        }
    }

    /// Start with an existing session id instead of logging in lazily
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add a static header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `PIHOLE_URL`: base URL (required)
    /// - `PIHOLE_PASSWORD`: password, selects the current API
    /// - `PIHOLE_API_TOKEN`: static token, selects the legacy API
    /// - `PIHOLE_SESSION_ID`: optional pre-existing session (current API)
    ///
    /// Exactly one of `PIHOLE_PASSWORD` and `PIHOLE_API_TOKEN` must be set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(ENV_URL).ok_or_else(|| {
            Error::validation(format!(
                "{} is required. Set it via: export {}=http://pi.hole",
                ENV_URL, ENV_URL
            ))
        })?;

        let credential = match (non_empty(ENV_PASSWORD), non_empty(ENV_API_TOKEN)) {
            (Some(password), None) => Credential::password(password),
            (None, Some(token)) => Credential::api_token(token),
            (Some(_), Some(_)) => {
                return Err(Error::validation(format!(
                    "{} and {} are mutually exclusive",
                    ENV_PASSWORD, ENV_API_TOKEN
                )));
            }
            (None, None) => {
                return Err(Error::validation(format!(
                    "one of {} or {} is required",
                    ENV_PASSWORD, ENV_API_TOKEN
                )));
            }
        };

        let config = Self {
            base_url,
            credential,
            session_id: non_empty(ENV_SESSION_ID),
            headers: BTreeMap::new(),
        };
        config.validate()?;
        Ok(config)
    }

    /// API generation selected by the credential
    pub fn generation(&self) -> ApiGeneration {
        self.credential.generation()
    }

    /// Base URL with trailing slashes stripped
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.normalized_base_url();
        if base_url.is_empty() {
            return Err(Error::validation("base URL cannot be empty"));
        }

        let parsed = Url::parse(base_url)
            .map_err(|e| Error::validation(format!("invalid base URL '{}': {}", base_url, e)))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::validation(format!(
                    "base URL must use http or https, got '{}'",
                    other
                )));
            }
        }
        if parsed.query().is_some() {
            return Err(Error::validation("base URL cannot carry a query string"));
        }

        if self.credential.secret().is_empty() {
            return Err(Error::validation(match self.credential {
                Credential::Password { .. } => "password cannot be empty",
                Credential::ApiToken { .. } => "API token cannot be empty",
            }));
        }

        if let Some(session_id) = &self.session_id {
            if self.generation() == ApiGeneration::Legacy {
                return Err(Error::validation(
                    "a session id cannot be used with the legacy API token",
                ));
            }
            if session_id.is_empty() {
                return Err(Error::validation("session id cannot be empty"));
            }
        }

        for name in self.headers.keys() {
            let valid = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_graphic() && c != ':');
            if !valid {
                return Err(Error::validation(format!("invalid header name '{}'", name)));
            }
        }

        Ok(())
    }

    /// Static headers: defaults first, then configured headers, with
    /// configured values replacing defaults of the same name
    pub fn effective_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("user-agent".to_string(), DEFAULT_USER_AGENT.to_string())];

        for (name, value) in &self.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        headers
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .field("session_id", &self.session_id.as_ref().map(|_| "<REDACTED>"))
            .field("headers", &self.headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = ClientConfig::new("http://pi.hole///", Credential::password("pw"));
        assert_eq!(config.normalized_base_url(), "http://pi.hole");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = ClientConfig::new("", Credential::password("pw"));
        assert!(matches!(config.validate(), Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let config = ClientConfig::new("ftp://pi.hole", Credential::password("pw"));
        assert!(matches!(config.validate(), Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_empty_credential_rejected() {
        let config = ClientConfig::new("http://pi.hole", Credential::api_token(""));
        assert!(matches!(config.validate(), Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_session_id_rejected_for_legacy() {
        let config = ClientConfig::new("http://pi.hole/admin/api.php", Credential::api_token("t"))
            .with_session_id("sid");
        assert!(matches!(config.validate(), Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_configured_header_overrides_default() {
        let config = ClientConfig::new("http://pi.hole", Credential::password("pw"))
            .with_header("User-Agent", "custom")
            .with_header("X-Extra", "1");
        let headers = config.effective_headers();
        assert_eq!(
            headers,
            vec![
                ("User-Agent".to_string(), "custom".to_string()),
                ("X-Extra".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_lookup_password_selects_current_api() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "http://pi.hole"),
            (ENV_PASSWORD, "secret"),
        ]))
        .unwrap();
        assert_eq!(config.generation(), ApiGeneration::Current);
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_from_lookup_token_selects_legacy_api() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "http://pi.hole/admin/api.php"),
            (ENV_API_TOKEN, "token"),
        ]))
        .unwrap();
        assert_eq!(config.generation(), ApiGeneration::Legacy);
    }

    #[test]
    fn test_from_lookup_requires_exactly_one_credential() {
        let both = ClientConfig::from_lookup(lookup(&[
            (ENV_URL, "http://pi.hole"),
            (ENV_PASSWORD, "secret"),
            (ENV_API_TOKEN, "token"),
        ]));
        assert!(matches!(both, Err(Error::ClientValidation(_))));

        let neither = ClientConfig::from_lookup(lookup(&[(ENV_URL, "http://pi.hole")]));
        assert!(matches!(neither, Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_from_lookup_requires_url() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_PASSWORD, "secret")]));
        assert!(matches!(result, Err(Error::ClientValidation(_))));
    }

    #[test]
    fn test_secrets_not_exposed_in_debug() {
        let config = ClientConfig::new("http://pi.hole", Credential::password("hunter2"))
            .with_session_id("sid-12345");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("hunter2"));
        assert!(!debug_str.contains("sid-12345"));
        assert!(debug_str.contains("ClientConfig"));
    }

    #[test]
    fn test_credential_deserializes_tagged() {
        let credential: Credential =
            serde_json::from_str(r#"{"type":"api_token","token":"abc"}"#).unwrap();
        assert_eq!(credential, Credential::api_token("abc"));
    }
}

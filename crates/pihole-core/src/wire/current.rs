//! Current (session-based) API wire adapter

use url::Url;

use crate::config::ApiGeneration;
use crate::error::{Error, Result};
use crate::traits::{HttpRequest, Method, Target, WireAdapter};

/// Header carrying the session id
pub const AUTH_HEADER: &str = "X-FTL-SID";

/// Login / logout endpoint
pub const AUTH_PATH: &str = "/api/auth";

/// Targets that are sent without a session
const PUBLIC_ENDPOINTS: &[(Method, &str)] = &[(Method::Post, AUTH_PATH)];

/// Adapter for the session-based REST API
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentApi;

impl WireAdapter for CurrentApi {
    fn generation(&self) -> ApiGeneration {
        ApiGeneration::Current
    }

    fn accepts(&self, target: &Target) -> bool {
        matches!(target, Target::Path(_))
    }

    fn requires_auth(&self, method: Method, target: &Target) -> bool {
        match target {
            Target::Path(path) => !PUBLIC_ENDPOINTS
                .iter()
                .any(|(m, p)| *m == method && p == path),
            Target::Query(_) => true,
        }
    }

    fn url(&self, base_url: &str, target: &Target) -> Result<Url> {
        let Target::Path(path) = target else {
            return Err(Error::validation(format!(
                "query target {} cannot be sent to the current API",
                target
            )));
        };

        if !path.starts_with('/') {
            return Err(Error::validation(format!(
                "request path must start with '/': {}",
                path
            )));
        }

        Url::parse(&format!("{}{}", base_url, path))
            .map_err(|e| Error::validation(format!("invalid request URL for {}: {}", path, e)))
    }

    fn attach_credential(&self, request: &mut HttpRequest, credential: &str) {
        request
            .headers
            .push((AUTH_HEADER.to_string(), credential.to_string()));
    }
}

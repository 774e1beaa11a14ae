//! Legacy (query-string) API wire adapter
//!
//! Every call is a `GET` against the single `api.php` endpoint. The static
//! token rides along as a query parameter; there is no session.

use url::Url;

use crate::config::ApiGeneration;
use crate::error::{Error, Result};
use crate::traits::{HttpRequest, Method, Target, WireAdapter};

/// Query parameter carrying the static token
pub const AUTH_PARAM: &str = "auth";

/// Adapter for the legacy `api.php` API
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyApi;

impl WireAdapter for LegacyApi {
    fn generation(&self) -> ApiGeneration {
        ApiGeneration::Legacy
    }

    fn accepts(&self, target: &Target) -> bool {
        matches!(target, Target::Query(_))
    }

    fn requires_auth(&self, _method: Method, _target: &Target) -> bool {
        true
    }

    fn url(&self, base_url: &str, target: &Target) -> Result<Url> {
        let Target::Query(params) = target else {
            return Err(Error::validation(format!(
                "path target {} cannot be sent to the legacy API",
                target
            )));
        };

        let mut url = Url::parse(base_url)
            .map_err(|e| Error::validation(format!("invalid base URL '{}': {}", base_url, e)))?;

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    fn attach_credential(&self, request: &mut HttpRequest, credential: &str) {
        request
            .url
            .query_pairs_mut()
            .append_pair(AUTH_PARAM, credential);
    }
}

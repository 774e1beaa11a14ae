//! Blocking status (legacy API)

use pihole_core::{Dispatcher, Result};
use serde::{Deserialize, Serialize};

use crate::response::expect_success;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

/// Whether ad blocking is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdBlockerStatus {
    pub enabled: bool,
}

/// Ad blocker collaborator
#[derive(Debug, Clone, Copy)]
pub struct AdBlocker<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> AdBlocker<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn status(&self) -> Result<AdBlockerStatus> {
        self.send([("status", "true".to_string())]).await
    }

    pub async fn enable(&self) -> Result<AdBlockerStatus> {
        let status = self.send([("enable", "true".to_string())]).await?;
        tracing::info!("Ad blocking enabled");
        Ok(status)
    }

    /// Disable blocking for `seconds`, or indefinitely when 0
    pub async fn disable(&self, seconds: u64) -> Result<AdBlockerStatus> {
        let status = self.send([("disable", seconds.to_string())]).await?;
        tracing::info!("Ad blocking disabled ({}s)", seconds);
        Ok(status)
    }

    /// Enable, or disable for `disabled_secs` (0 = indefinitely)
    pub async fn update(&self, enabled: bool, disabled_secs: u64) -> Result<AdBlockerStatus> {
        if enabled {
            self.enable().await
        } else {
            self.disable(disabled_secs).await
        }
    }

    async fn send(&self, params: [(&str, String); 1]) -> Result<AdBlockerStatus> {
        let response = self.dispatcher.query(params).await?;
        expect_success(&response, "ad blocker status")?;

        let body: StatusResponse = response.json("ad blocker status")?;
        Ok(AdBlockerStatus {
            enabled: body.status.eq_ignore_ascii_case("enabled"),
        })
    }
}

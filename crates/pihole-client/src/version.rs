//! Component versions (legacy API)

use pihole_core::{Dispatcher, Result};
use serde::{Deserialize, Serialize};

use crate::response::expect_success;

/// Installed and available versions of the appliance components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentVersions {
    pub core_update: bool,
    pub web_update: bool,
    #[serde(rename = "FTL_update")]
    pub ftl_update: bool,
    pub core_current: String,
    pub web_current: String,
    #[serde(rename = "FTL_current")]
    pub ftl_current: String,
    pub core_latest: String,
    pub web_latest: String,
    #[serde(rename = "FTL_latest")]
    pub ftl_latest: String,
    pub core_branch: String,
    pub web_branch: String,
    #[serde(rename = "FTL_branch")]
    pub ftl_branch: String,
}

/// Version collaborator
#[derive(Debug, Clone, Copy)]
pub struct Version<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Version<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&self) -> Result<ComponentVersions> {
        let response = self.dispatcher.query([("versions", "true")]).await?;
        expect_success(&response, "fetch versions")?;
        response.json("versions")
    }
}

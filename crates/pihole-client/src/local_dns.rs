//! Local DNS host records (current API)
//!
//! - List: `GET /api/config/dns/hosts`
//! - Create: `PUT /api/config/dns/hosts/<ip>%20<domain>` (201)
//! - Delete: `DELETE /api/config/dns/hosts/<ip>%20<domain>` (204)

use pihole_core::{Dispatcher, EntityKind, Error, Result};
use serde::Deserialize;

use crate::record::{DnsRecord, validate_segment_value};
use crate::response::{expect_status, expect_success};

const HOSTS_PATH: &str = "/api/config/dns/hosts";

#[derive(Debug, Deserialize)]
struct HostsResponse {
    config: HostsConfig,
}

#[derive(Debug, Deserialize)]
struct HostsConfig {
    dns: HostsDns,
}

#[derive(Debug, Deserialize)]
struct HostsDns {
    #[serde(default)]
    hosts: Vec<String>,
}

/// Local DNS records collaborator
#[derive(Debug, Clone, Copy)]
pub struct LocalDns<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> LocalDns<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// List all local DNS records
    pub async fn list(&self) -> Result<Vec<DnsRecord>> {
        let response = self.dispatcher.get(HOSTS_PATH).await?;
        expect_success(&response, "list local DNS records")?;

        let body: HostsResponse = response.json("local DNS list")?;
        body.config
            .dns
            .hosts
            .iter()
            .map(|entry| DnsRecord::parse_host(entry))
            .collect()
    }

    /// Get the record for `domain` (case-insensitive)
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] with [`EntityKind::DnsRecord`] if no record matches.
    pub async fn get(&self, domain: &str) -> Result<DnsRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|record| record.domain.eq_ignore_ascii_case(domain))
            .ok_or_else(|| Error::not_found(EntityKind::DnsRecord, domain))
    }

    /// Create a record and return it as stored by the appliance
    pub async fn create(&self, domain: &str, ip: &str) -> Result<DnsRecord> {
        validate_segment_value("domain", domain)?;
        validate_segment_value("ip", ip)?;

        let record = DnsRecord::new(domain, ip);
        let path = format!("{}/{}", HOSTS_PATH, record.path_segment());
        let response = self.dispatcher.put(&path, None).await?;
        expect_status(&response, 201, "create local DNS record")?;

        tracing::info!("Created local DNS record {} -> {}", domain, ip);
        self.get(domain).await
    }

    /// Point `domain` at `ip`
    ///
    /// Not atomic: this deletes the existing record, then creates the new
    /// one. If the create fails (or the future is dropped in between) the
    /// domain is left without a record.
    pub async fn update(&self, domain: &str, ip: &str) -> Result<DnsRecord> {
        validate_segment_value("domain", domain)?;
        validate_segment_value("ip", ip)?;

        self.delete(domain).await?;
        self.create(domain, ip).await
    }

    /// Delete the record for `domain`; deleting an absent record succeeds
    pub async fn delete(&self, domain: &str) -> Result<()> {
        let record = match self.get(domain).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                tracing::debug!("Local DNS record {} already absent", domain);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let path = format!("{}/{}", HOSTS_PATH, record.path_segment());
        let response = self.dispatcher.delete(&path).await?;
        expect_status(&response, 204, "delete local DNS record")?;

        tracing::info!("Deleted local DNS record {} -> {}", record.domain, record.ip);
        Ok(())
    }
}

//! Custom DNS records (legacy API)
//!
//! Every operation is a `GET` of the legacy endpoint with
//! `customdns=true&action=<get|add|delete>`.

use pihole_core::{Dispatcher, EntityKind, Error, Result};
use serde::Deserialize;

use crate::record::DnsRecord;
use crate::response::{expect_ack, expect_success};

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<Vec<String>>,
}

/// Legacy custom DNS collaborator
#[derive(Debug, Clone, Copy)]
pub struct CustomDns<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> CustomDns<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Vec<DnsRecord>> {
        let response = self
            .dispatcher
            .query([("customdns", "true"), ("action", "get")])
            .await?;
        expect_success(&response, "list custom DNS records")?;

        let body: ListResponse = response.json("custom DNS list")?;
        body.data.iter().map(|row| DnsRecord::from_row(row)).collect()
    }

    /// Get the record for `domain` (case-insensitive)
    pub async fn get(&self, domain: &str) -> Result<DnsRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|record| record.domain.eq_ignore_ascii_case(domain))
            .ok_or_else(|| Error::not_found(EntityKind::DnsRecord, domain))
    }

    /// Create a record
    ///
    /// # Errors
    ///
    /// [`Error::Rejected`] when the appliance acknowledges with
    /// `success: false` (e.g. the record already exists).
    pub async fn create(&self, domain: &str, ip: &str) -> Result<DnsRecord> {
        if domain.is_empty() || ip.is_empty() {
            return Err(Error::validation("domain and ip must not be empty"));
        }

        let response = self
            .dispatcher
            .query([
                ("customdns", "true"),
                ("action", "add"),
                ("ip", ip),
                ("domain", domain),
            ])
            .await?;
        expect_ack(&response, "add custom DNS record")?;

        tracing::info!("Created custom DNS record {} -> {}", domain, ip);
        Ok(DnsRecord::new(domain, ip))
    }

    /// Point `domain` at `ip`
    ///
    /// Not atomic: delete followed by create. A failure after the delete
    /// leaves the domain without a record.
    pub async fn update(&self, domain: &str, ip: &str) -> Result<DnsRecord> {
        self.delete(domain).await?;
        self.create(domain, ip).await
    }

    /// Delete the record for `domain`; deleting an absent record succeeds
    pub async fn delete(&self, domain: &str) -> Result<()> {
        let record = match self.get(domain).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                tracing::debug!("Custom DNS record {} already absent", domain);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let response = self
            .dispatcher
            .query([
                ("customdns", "true"),
                ("action", "delete"),
                ("domain", record.domain.as_str()),
                ("ip", record.ip.as_str()),
            ])
            .await?;
        expect_ack(&response, "delete custom DNS record")?;

        tracing::info!("Deleted custom DNS record {} -> {}", record.domain, record.ip);
        Ok(())
    }
}

//! Local CNAME records (current API)

use pihole_core::{Dispatcher, EntityKind, Error, Result};
use serde::Deserialize;

use crate::record::{CnameRecord, validate_segment_value};
use crate::response::{expect_status, expect_success};

const CNAME_PATH: &str = "/api/config/dns/cnameRecords";

#[derive(Debug, Deserialize)]
struct CnameResponse {
    config: CnameConfig,
}

#[derive(Debug, Deserialize)]
struct CnameConfig {
    dns: CnameDns,
}

#[derive(Debug, Deserialize)]
struct CnameDns {
    #[serde(rename = "cnameRecords", default)]
    cname_records: Vec<String>,
}

/// Local CNAME records collaborator
#[derive(Debug, Clone, Copy)]
pub struct LocalCname<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> LocalCname<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn list(&self) -> Result<Vec<CnameRecord>> {
        let response = self.dispatcher.get(CNAME_PATH).await?;
        expect_success(&response, "list CNAME records")?;

        let body: CnameResponse = response.json("CNAME list")?;
        body.config
            .dns
            .cname_records
            .iter()
            .map(|entry| CnameRecord::parse(entry))
            .collect()
    }

    /// Get the record for `domain` (case-insensitive)
    pub async fn get(&self, domain: &str) -> Result<CnameRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|record| record.domain.eq_ignore_ascii_case(domain))
            .ok_or_else(|| Error::not_found(EntityKind::CnameRecord, domain))
    }

    /// Create `domain` as an alias of `target`
    pub async fn create(&self, domain: &str, target: &str) -> Result<CnameRecord> {
        self.create_record(CnameRecord::new(domain, target)).await
    }

    /// Create `domain` as an alias of `target` with an explicit TTL
    pub async fn create_with_ttl(&self, domain: &str, target: &str, ttl: u32) -> Result<CnameRecord> {
        self.create_record(CnameRecord::new(domain, target).with_ttl(ttl))
            .await
    }

    /// Re-point `domain` at `target`
    ///
    /// Not atomic: the existing record is deleted before the new one is
    /// created, so a failure in between leaves `domain` without a CNAME.
    pub async fn update(&self, domain: &str, target: &str) -> Result<CnameRecord> {
        validate_segment_value("domain", domain)?;
        validate_segment_value("target", target)?;

        self.delete(domain).await?;
        self.create(domain, target).await
    }

    /// Delete the record for `domain`; deleting an absent record succeeds
    pub async fn delete(&self, domain: &str) -> Result<()> {
        let record = match self.get(domain).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                tracing::debug!("CNAME record {} already absent", domain);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // The stored TTL is part of the record key
        let path = format!("{}/{}", CNAME_PATH, record.path_segment());
        let response = self.dispatcher.delete(&path).await?;
        expect_status(&response, 204, "delete CNAME record")?;

        tracing::info!("Deleted CNAME record {} -> {}", record.domain, record.target);
        Ok(())
    }

    async fn create_record(&self, record: CnameRecord) -> Result<CnameRecord> {
        validate_segment_value("domain", &record.domain)?;
        validate_segment_value("target", &record.target)?;

        let path = format!("{}/{}", CNAME_PATH, record.path_segment());
        let response = self.dispatcher.put(&path, None).await?;
        expect_status(&response, 201, "create CNAME record")?;

        tracing::info!("Created CNAME record {} -> {}", record.domain, record.target);
        self.get(&record.domain).await
    }
}

//! DNS and CNAME record values and their wire encodings
//!
//! The current API stores each record as one config string
//! (`"<ip> <domain> [<alias>...]"` for hosts, `"<domain>,<target>[,<ttl>]"` for CNAMEs) and addresses it by
//! the same tuple as an escaped path segment. The parsers here check arity
//! and fail with [`Error::Decode`] on malformed entries.

use pihole_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A local DNS (A/AAAA) record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub domain: String,
    pub ip: String,
    /// Further names on the same hosts line; the record is keyed on `domain`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl DnsRecord {
    pub fn new(domain: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip: ip.into(),
            aliases: Vec::new(),
        }
    }

    /// Parse a hosts entry of the form `"<ip> <domain> [<alias>...]"`
    pub fn parse_host(entry: &str) -> Result<Self> {
        let fields: Vec<&str> = entry.split_whitespace().collect();
        match fields.as_slice() {
            [ip, domain, aliases @ ..] => Ok(Self {
                domain: domain.to_string(),
                ip: ip.to_string(),
                aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
            }),
            _ => Err(Error::decode(
                "DNS host entry",
                format!("expected \"<ip> <domain>\", got {:?}", entry),
            )),
        }
    }

    /// Parse a legacy `[domain, ip]` row
    pub fn from_row(row: &[String]) -> Result<Self> {
        match row {
            [domain, ip] => Ok(Self::new(domain.clone(), ip.clone())),
            _ => Err(Error::decode(
                "custom DNS row",
                format!("expected [domain, ip], got {} fields", row.len()),
            )),
        }
    }

    /// Escaped path segment `<ip>%20<domain>[%20<alias>...]`
    pub(crate) fn path_segment(&self) -> String {
        let mut segment = format!("{}%20{}", self.ip, self.domain);
        for alias in &self.aliases {
            segment.push_str("%20");
            segment.push_str(alias);
        }
        segment
    }
}

/// A local CNAME record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnameRecord {
    pub domain: String,
    pub target: String,
    /// TTL in seconds; `None` when the record carries no TTL field
    pub ttl: Option<u32>,
}

impl CnameRecord {
    pub fn new(domain: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Parse an entry of the form `"<domain>,<target>[,<ttl>]"`
    pub fn parse(entry: &str) -> Result<Self> {
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();
        match fields.as_slice() {
            [domain, target] if !domain.is_empty() && !target.is_empty() => {
                Ok(Self::new(*domain, *target))
            }
            [domain, target, ttl] if !domain.is_empty() && !target.is_empty() => {
                let ttl = ttl.parse::<u32>().map_err(|e| {
                    Error::decode("CNAME entry", format!("invalid TTL {:?}: {}", ttl, e))
                })?;
                Ok(Self::new(*domain, *target).with_ttl(ttl))
            }
            _ => Err(Error::decode(
                "CNAME entry",
                format!("expected \"<domain>,<target>[,<ttl>]\", got {:?}", entry),
            )),
        }
    }

    /// Escaped path segment `<domain>%2C<target>[%2C<ttl>]`
    pub(crate) fn path_segment(&self) -> String {
        match self.ttl {
            Some(ttl) => format!("{}%2C{}%2C{}", self.domain, self.target, ttl),
            None => format!("{}%2C{}", self.domain, self.target),
        }
    }
}

/// Reject values that cannot be embedded in a composite path segment
pub(crate) fn validate_segment_value(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ',' | '/' | '%' | '?' | '#'))
    {
        return Err(Error::validation(format!(
            "{} {:?} contains characters not allowed in a record",
            field, value
        )));
    }
    Ok(())
}

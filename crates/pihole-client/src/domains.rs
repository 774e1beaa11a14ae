// # Domain Lists (legacy API)
//
// Allow/deny lists, exact and regex. Each list type is fetched with its own
// `?list=<type>` request; `add=` and `sub=` mutate a list.

use pihole_core::{Dispatcher, EntityKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::response::{expect_ack, expect_success};

/// Domain list kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    White,
    Black,
    RegexWhite,
    RegexBlack,
}

impl ListType {
    /// Every list type, in wire code order
    pub const ALL: [ListType; 4] = [
        ListType::White,
        ListType::Black,
        ListType::RegexWhite,
        ListType::RegexBlack,
    ];

    /// Name used in the `list=` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::White => "white",
            ListType::Black => "black",
            ListType::RegexWhite => "regex_white",
            ListType::RegexBlack => "regex_black",
        }
    }

    /// Numeric type code used in list responses
    pub fn code(&self) -> u8 {
        match self {
            ListType::White => 0,
            ListType::Black => 1,
            ListType::RegexWhite => 2,
            ListType::RegexBlack => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(ListType::White),
            1 => Ok(ListType::Black),
            2 => Ok(ListType::RegexWhite),
            3 => Ok(ListType::RegexBlack),
            other => Err(Error::decode(
                "domain list entry",
                format!("type {} does not match a known list type", other),
            )),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ListType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown domain list type: {}", s)))
    }
}

/// An entry in one of the domain lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    pub id: i64,
    pub list: ListType,
    pub domain: String,
    pub enabled: bool,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct EntryResponse {
    id: i64,
    #[serde(rename = "type")]
    kind: i64,
    domain: String,
    #[serde(default)]
    enabled: i64,
    #[serde(default)]
    comment: Option<String>,
}

impl EntryResponse {
    fn into_entry(self) -> Result<DomainEntry> {
        Ok(DomainEntry {
            id: self.id,
            list: ListType::from_code(self.kind)?,
            domain: self.domain,
            enabled: self.enabled == 1,
            comment: self.comment.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<EntryResponse>,
}

/// Domain lists collaborator
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// List entries of the given list types, or of all four when empty
    ///
    /// One request per list type, issued in order.
    pub async fn list(&self, types: &[ListType]) -> Result<Vec<DomainEntry>> {
        let types: &[ListType] = if types.is_empty() { &ListType::ALL } else { types };

        let mut entries = Vec::new();
        for list in types {
            let response = self.dispatcher.query([("list", list.as_str())]).await?;
            expect_success(&response, "list domains")?;

            let body: ListResponse = response.json("domain list")?;
            for entry in body.data {
                entries.push(entry.into_entry()?);
            }
        }
        Ok(entries)
    }

    /// Get `domain` from `list` (case-insensitive)
    pub async fn get(&self, domain: &str, list: ListType) -> Result<DomainEntry> {
        self.list(&[list])
            .await?
            .into_iter()
            .find(|entry| entry.domain.eq_ignore_ascii_case(domain))
            .ok_or_else(|| Error::not_found(EntityKind::Domain, format!("{} ({})", domain, list)))
    }

    /// Add `domain` to `list`, optionally with a comment
    pub async fn create(&self, domain: &str, list: ListType, comment: Option<&str>) -> Result<DomainEntry> {
        if domain.is_empty() {
            return Err(Error::validation("domain must not be empty"));
        }

        let mut params = vec![("list", list.as_str()), ("add", domain)];
        if let Some(comment) = comment {
            params.push(("comment", comment));
        }

        let response = self.dispatcher.query(params).await?;
        expect_ack(&response, "add domain")?;

        tracing::info!("Added {} to {} list", domain, list);
        self.get(domain, list).await
    }

    /// Remove `domain` from `list`; removing an absent domain succeeds
    pub async fn delete(&self, domain: &str, list: ListType) -> Result<()> {
        let entry = match self.get(domain, list).await {
            Ok(entry) => entry,
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} not on {} list", domain, list);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let response = self
            .dispatcher
            .query([("list", list.as_str()), ("sub", entry.domain.as_str())])
            .await?;
        expect_ack(&response, "remove domain")?;

        tracing::info!("Removed {} from {} list", entry.domain, list);
        Ok(())
    }
}

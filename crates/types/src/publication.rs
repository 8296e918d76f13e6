//! Publication data model.

use crate::{Address, Amount, Cid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registry-assigned publication identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicationId(pub u64);

impl PublicationId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PublicationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PublicationId)
    }
}

/// Viewing policy of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Open,
    Paid,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::Open => "open",
            AccessMode::Paid => "paid",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "free" => Ok(AccessMode::Open),
            "paid" => Ok(AccessMode::Paid),
            other => Err(format!("unknown access mode: {other}")),
        }
    }
}

/// Registration request sent to the registry.
///
/// `authors[0]` must be the publisher; the registry rejects drafts that break
/// this rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDraft {
    pub title: String,
    pub authors: Vec<Address>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub content: Cid,
    pub access_mode: AccessMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
}

/// A registered publication. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: PublicationId,
    pub publisher: Address,
    pub title: String,
    pub authors: Vec<Address>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub content: Cid,
    pub access_mode: AccessMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    pub created_at: DateTime<Utc>,
}

impl Publication {
    pub fn from_draft(
        id: PublicationId,
        publisher: Address,
        draft: PublicationDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            publisher,
            title: draft.title,
            authors: draft.authors,
            abstract_text: draft.abstract_text,
            keywords: draft.keywords,
            content: draft.content,
            access_mode: draft.access_mode,
            price: draft.price,
            created_at,
        }
    }

    /// First entry of the author list, which is always the submitter.
    pub fn submitter(&self) -> Option<&Address> {
        self.authors.first()
    }
}

/// Price attached to a paid publication. Absence means free access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPriceRecord {
    pub publication_id: PublicationId,
    pub cost: Amount,
    pub set_by: Address,
    pub set_at: DateTime<Utc>,
}

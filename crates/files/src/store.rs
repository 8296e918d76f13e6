//! Content store interface.

use crate::errors::Result;
use async_trait::async_trait;
use researchchain_types::Cid;
use serde::{Deserialize, Serialize};

/// What kind of document is being pinned. Recorded as pin metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Paper,
    Review,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Paper => "paper",
            ContentKind::Review => "review",
        }
    }

    /// Value of the `uploadedBy` metadata key.
    pub fn uploaded_by(&self) -> &'static str {
        match self {
            ContentKind::Paper => "PeerReviewSystem",
            ContentKind::Review => "Reviewer",
        }
    }
}

/// A file handed to the store.
#[derive(Debug, Clone)]
pub struct ContentUpload {
    pub name: String,
    pub bytes: Vec<u8>,
    pub kind: ContentKind,
}

impl ContentUpload {
    pub fn paper(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            kind: ContentKind::Paper,
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContent {
    pub cid: Cid,
    /// Gateway URL the content can be fetched from.
    pub url: String,
    pub size_bytes: u64,
}

/// Content-addressed storage backend.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store raw bytes and return their identifier.
    async fn upload(&self, upload: ContentUpload) -> Result<StoredContent>;

    /// Store a JSON document (e.g. a peer review).
    async fn upload_json(
        &self,
        name: &str,
        kind: ContentKind,
        document: &serde_json::Value,
    ) -> Result<StoredContent>;

    /// Retrieve the bytes behind `cid`.
    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>>;

    /// Stop pinning `cid`.
    async fn unpin(&self, cid: &Cid) -> Result<()>;

    /// Public URL for `cid`.
    fn gateway_url(&self, cid: &Cid) -> String;
}

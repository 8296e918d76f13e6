//! In-memory content store.

use crate::errors::{ContentError, Result};
use crate::store::{ContentKind, ContentStore, ContentUpload, StoredContent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use researchchain_types::Cid;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const MEMORY_GATEWAY: &str = "memory://ipfs/";

/// In-memory content store (for testing and embedded deployments).
///
/// Identifiers are CIDv0-style multihashes of the raw bytes, so identical
/// content maps to the same identifier.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<MemoryContentStoreInner>,
}

#[derive(Default)]
struct MemoryContentStoreInner {
    /// Primary index: CID -> pinned blob
    blobs: RwLock<HashMap<Cid, PinnedBlob>>,

    /// Upload calls accepted, including re-uploads of identical content
    uploads: AtomicU64,
}

#[derive(Debug, Clone)]
struct PinnedBlob {
    name: String,
    kind: ContentKind,
    bytes: Vec<u8>,
    pinned_at: DateTime<Utc>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upload calls that reached the store.
    pub fn upload_count(&self) -> u64 {
        self.inner.uploads.load(Ordering::SeqCst)
    }

    /// Number of distinct pinned blobs.
    pub fn pinned_count(&self) -> usize {
        self.inner.blobs.read().len()
    }

    /// Name and kind recorded when `cid` was pinned.
    pub fn pin_metadata(&self, cid: &Cid) -> Option<(String, ContentKind, DateTime<Utc>)> {
        self.inner
            .blobs
            .read()
            .get(cid)
            .map(|blob| (blob.name.clone(), blob.kind, blob.pinned_at))
    }

    fn pin(&self, name: &str, kind: ContentKind, bytes: Vec<u8>) -> Result<StoredContent> {
        if bytes.is_empty() {
            return Err(ContentError::EmptyContent {
                name: name.to_string(),
            });
        }

        self.inner.uploads.fetch_add(1, Ordering::SeqCst);

        let cid = Cid::v0_from_data(&bytes);
        let size_bytes = bytes.len() as u64;

        {
            let mut blobs = self.inner.blobs.write();
            blobs.entry(cid.clone()).or_insert_with(|| PinnedBlob {
                name: name.to_string(),
                kind,
                bytes,
                pinned_at: Utc::now(),
            });
        }

        debug!(%cid, name, kind = kind.as_str(), size_bytes, "pinned content in memory");

        Ok(StoredContent {
            url: self.gateway_url(&cid),
            cid,
            size_bytes,
        })
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn upload(&self, upload: ContentUpload) -> Result<StoredContent> {
        self.pin(&upload.name, upload.kind, upload.bytes)
    }

    async fn upload_json(
        &self,
        name: &str,
        kind: ContentKind,
        document: &serde_json::Value,
    ) -> Result<StoredContent> {
        let bytes = serde_json::to_vec(document)?;
        self.pin(name, kind, bytes)
    }

    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>> {
        let blobs = self.inner.blobs.read();
        blobs
            .get(cid)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| ContentError::NotFound { cid: cid.clone() })
    }

    async fn unpin(&self, cid: &Cid) -> Result<()> {
        let mut blobs = self.inner.blobs.write();
        blobs
            .remove(cid)
            .map(|_| ())
            .ok_or_else(|| ContentError::NotFound { cid: cid.clone() })
    }

    fn gateway_url(&self, cid: &Cid) -> String {
        format!("{MEMORY_GATEWAY}{cid}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_fetch() {
        let store = MemoryContentStore::new();
        let stored = store
            .upload(ContentUpload::paper("paper.pdf", b"%PDF-1.7 body".to_vec()))
            .await
            .unwrap();

        assert_eq!(stored.size_bytes, 13);
        assert_eq!(stored.url, format!("memory://ipfs/{}", stored.cid));
        assert_eq!(store.fetch(&stored.cid).await.unwrap(), b"%PDF-1.7 body");

        let (name, kind, _) = store.pin_metadata(&stored.cid).unwrap();
        assert_eq!(name, "paper.pdf");
        assert_eq!(kind, ContentKind::Paper);
    }

    #[tokio::test]
    async fn test_identical_content_same_cid() {
        let store = MemoryContentStore::new();
        let a = store
            .upload(ContentUpload::paper("a.pdf", b"same".to_vec()))
            .await
            .unwrap();
        let b = store
            .upload(ContentUpload::paper("b.pdf", b"same".to_vec()))
            .await
            .unwrap();

        assert_eq!(a.cid, b.cid);
        assert_eq!(store.upload_count(), 2);
        assert_eq!(store.pinned_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let store = MemoryContentStore::new();
        let result = store.upload(ContentUpload::paper("empty.pdf", vec![])).await;
        assert!(matches!(result, Err(ContentError::EmptyContent { .. })));
        assert_eq!(store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_unpin_removes_content() {
        let store = MemoryContentStore::new();
        let stored = store
            .upload(ContentUpload::paper("paper.pdf", b"bytes".to_vec()))
            .await
            .unwrap();

        store.unpin(&stored.cid).await.unwrap();
        assert!(matches!(
            store.fetch(&stored.cid).await,
            Err(ContentError::NotFound { .. })
        ));
        assert!(store.unpin(&stored.cid).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_json_review() {
        let store = MemoryContentStore::new();
        let review = serde_json::json!({ "paper": 3, "verdict": "accept" });
        let stored = store
            .upload_json("review_3.json", ContentKind::Review, &review)
            .await
            .unwrap();

        let bytes = store.fetch(&stored.cid).await.unwrap();
        let back: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, review);
    }
}

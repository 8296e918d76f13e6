//! Content store backed by a local directory.
//!
//! Each blob is written to `<root>/<cid>` with a `<cid>.meta.json` sidecar
//! recording the original name, kind and pin time.

use crate::errors::{ContentError, Result};
use crate::store::{ContentKind, ContentStore, ContentUpload, StoredContent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use researchchain_types::Cid;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalPinMetadata {
    pub name: String,
    pub kind: ContentKind,
    pub size_bytes: u64,
    pub pinned_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    /// Open (and create if needed) a content directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "opened local content store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, cid: &Cid) -> PathBuf {
        self.root.join(cid.as_str())
    }

    fn meta_path(&self, cid: &Cid) -> PathBuf {
        self.root.join(format!("{cid}.meta.json"))
    }

    /// Metadata recorded when `cid` was pinned.
    pub async fn metadata(&self, cid: &Cid) -> Result<LocalPinMetadata> {
        let raw = fs::read(self.meta_path(cid))
            .await
            .map_err(|e| not_found_or_io(e, cid))?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Write through a uniquely named temp file in the store root, so a
    /// path only ever holds a complete file even with concurrent writers.
    async fn write_atomic(&self, target: PathBuf, bytes: Vec<u8>) -> Result<()> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&root)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| ContentError::Io(std::io::Error::other(e)))??;
        Ok(())
    }

    async fn pin(&self, name: &str, kind: ContentKind, bytes: Vec<u8>) -> Result<StoredContent> {
        if bytes.is_empty() {
            return Err(ContentError::EmptyContent {
                name: name.to_string(),
            });
        }

        let cid = Cid::v0_from_data(&bytes);
        let size_bytes = bytes.len() as u64;
        let blob_path = self.blob_path(&cid);

        self.write_atomic(blob_path.clone(), bytes).await?;

        let meta = LocalPinMetadata {
            name: name.to_string(),
            kind,
            size_bytes,
            pinned_at: Utc::now(),
        };
        self.write_atomic(self.meta_path(&cid), serde_json::to_vec_pretty(&meta)?)
            .await?;

        debug!(%cid, path = %blob_path.display(), size_bytes, "pinned content on disk");

        Ok(StoredContent {
            url: self.gateway_url(&cid),
            cid,
            size_bytes,
        })
    }
}

fn not_found_or_io(err: std::io::Error, cid: &Cid) -> ContentError {
    if err.kind() == ErrorKind::NotFound {
        ContentError::NotFound { cid: cid.clone() }
    } else {
        ContentError::Io(err)
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn upload(&self, upload: ContentUpload) -> Result<StoredContent> {
        self.pin(&upload.name, upload.kind, upload.bytes).await
    }

    async fn upload_json(
        &self,
        name: &str,
        kind: ContentKind,
        document: &serde_json::Value,
    ) -> Result<StoredContent> {
        let bytes = serde_json::to_vec(document)?;
        self.pin(name, kind, bytes).await
    }

    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>> {
        fs::read(self.blob_path(cid))
            .await
            .map_err(|e| not_found_or_io(e, cid))
    }

    async fn unpin(&self, cid: &Cid) -> Result<()> {
        fs::remove_file(self.blob_path(cid))
            .await
            .map_err(|e| not_found_or_io(e, cid))?;
        match fs::remove_file(self.meta_path(cid)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ContentError::Io(e)),
        }
    }

    fn gateway_url(&self, cid: &Cid) -> String {
        format!("file://{}", self.blob_path(cid).display())
    }
}

//! Pinata-compatible IPFS pinning client.

use crate::errors::{ContentError, Result};
use crate::store::{ContentKind, ContentStore, ContentUpload, StoredContent};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use researchchain_types::Cid;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud/";
pub const DEFAULT_PINATA_GATEWAY_URL: &str = "https://gateway.pinata.cloud/ipfs/";

/// Connection settings for the pinning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinataConfig {
    pub api_url: String,
    pub gateway_url: String,
    pub api_key: String,
    pub secret_api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl PinataConfig {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_PINATA_API_URL.to_string(),
            gateway_url: DEFAULT_PINATA_GATEWAY_URL.to_string(),
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PinataErrorBody {
    error: Option<serde_json::Value>,
    message: Option<String>,
}

/// HTTP client for a Pinata-style pinning API.
#[derive(Clone)]
pub struct PinataContentStore {
    api_url: Url,
    gateway_url: Url,
    api_key: String,
    secret_api_key: String,
    http: Client,
}

impl PinataContentStore {
    pub fn new(config: PinataConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Self::with_http_client(config, http)
    }

    /// Use an existing reqwest client (useful for custom TLS or middleware).
    pub fn with_http_client(config: PinataConfig, http: Client) -> Result<Self> {
        Ok(Self {
            api_url: parse_base_url(&config.api_url)?,
            gateway_url: parse_base_url(&config.gateway_url)?,
            api_key: config.api_key,
            secret_api_key: config.secret_api_key,
            http,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("pinata_api_key", &self.api_key)
            .header("pinata_secret_api_key", &self.secret_api_key)
    }

    fn pin_metadata(name: &str, kind: ContentKind) -> serde_json::Value {
        json!({
            "name": name,
            "keyvalues": {
                "uploadedBy": kind.uploaded_by(),
                "type": kind.as_str(),
                "timestamp": Utc::now().timestamp_millis().to_string(),
            }
        })
    }

    async fn stored_from(&self, response: Response, fallback_size: u64) -> Result<StoredContent> {
        let pin: PinResponse = Self::map_response(response).await?;
        let cid = Cid::new(pin.ipfs_hash)?;
        Ok(StoredContent {
            url: self.gateway_url(&cid),
            size_bytes: pin.pin_size.unwrap_or(fallback_size),
            cid,
        })
    }

    async fn map_response<T>(response: Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::map_api_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn map_api_error(response: Response) -> ContentError {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_slice::<PinataErrorBody>(&bytes) {
            let message = body
                .message
                .or_else(|| body.error.map(|e| e.to_string()))
                .unwrap_or_else(|| "request failed".into());
            return ContentError::Rejected { status, message };
        }
        ContentError::Rejected {
            status,
            message: String::from_utf8_lossy(&bytes).to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|_| ContentError::InvalidEndpoint(raw.to_string()))?;
    if !url.path().ends_with('/') {
        let mut path = url.path().trim_end_matches('/').to_owned();
        path.push('/');
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl ContentStore for PinataContentStore {
    async fn upload(&self, upload: ContentUpload) -> Result<StoredContent> {
        if upload.bytes.is_empty() {
            return Err(ContentError::EmptyContent { name: upload.name });
        }

        let size = upload.bytes.len() as u64;
        let metadata = Self::pin_metadata(&upload.name, upload.kind);
        let form = Form::new()
            .part("file", Part::bytes(upload.bytes).file_name(upload.name.clone()))
            .text("pinataMetadata", metadata.to_string())
            .text("pinataOptions", json!({ "cidVersion": 0 }).to_string());

        let url = self.api_url.join("pinning/pinFileToIPFS")?;
        debug!(name = %upload.name, size, "pinning file");
        let response = self
            .authorized(self.http.post(url))
            .multipart(form)
            .send()
            .await?;

        let stored = self.stored_from(response, size).await?;
        info!(cid = %stored.cid, name = %upload.name, "file pinned");
        Ok(stored)
    }

    async fn upload_json(
        &self,
        name: &str,
        kind: ContentKind,
        document: &serde_json::Value,
    ) -> Result<StoredContent> {
        let payload = json!({
            "pinataOptions": { "cidVersion": 0 },
            "pinataMetadata": Self::pin_metadata(name, kind),
            "pinataContent": document,
        });
        let size = serde_json::to_vec(document)?.len() as u64;

        let url = self.api_url.join("pinning/pinJSONToIPFS")?;
        let response = self
            .authorized(self.http.post(url))
            .json(&payload)
            .send()
            .await?;

        let stored = self.stored_from(response, size).await?;
        info!(cid = %stored.cid, name, "json document pinned");
        Ok(stored)
    }

    async fn fetch(&self, cid: &Cid) -> Result<Vec<u8>> {
        let url = self.gateway_url.join(cid.as_str())?;
        let response = self.http.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound { cid: cid.clone() });
        }
        if !response.status().is_success() {
            return Err(Self::map_api_error(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn unpin(&self, cid: &Cid) -> Result<()> {
        let url = self.api_url.join(&format!("pinning/unpin/{cid}"))?;
        let response = self.authorized(self.http.delete(url)).send().await?;
        if !response.status().is_success() {
            let err = Self::map_api_error(response).await;
            warn!(%cid, error = %err, "unpin failed");
            return Err(err);
        }
        Ok(())
    }

    fn gateway_url(&self, cid: &Cid) -> String {
        format!("{}{}", self.gateway_url, cid)
    }
}

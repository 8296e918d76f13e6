//! Error types for content storage

use researchchain_types::{Cid, CidError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content not found: {cid}")]
    NotFound { cid: Cid },

    #[error("Refusing to store empty content: {name}")]
    EmptyContent { name: String },

    #[error("Pinning service rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Pinning service returned an invalid content identifier: {0}")]
    InvalidIdentifier(#[from] CidError),

    #[error("Invalid storage endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;

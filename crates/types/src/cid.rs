//! Content identifiers for blobs held by content-addressed storage.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Multihash code for sha2-256.
const MULTIHASH_SHA2_256: u8 = 0x12;
/// Digest length prefix for a 32-byte sha2-256 multihash.
const MULTIHASH_SHA2_256_LEN: u8 = 0x20;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CidError {
    #[error("content identifier is empty")]
    Empty,
    #[error("content identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Opaque content identifier.
///
/// The registry stores whatever identifier the content store returned, byte
/// for byte. The only normalisation applied is reducing a gateway URL such as
/// `https://gateway/ipfs/<cid>` to its final path segment when parsing user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Wrap an identifier returned by a content store without altering it.
    pub fn new(value: impl Into<String>) -> Result<Self, CidError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CidError::Empty);
        }
        if let Some(c) = value.chars().find(|c| c.is_whitespace() || *c == '/') {
            return Err(CidError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    /// Parse user input that may be either a bare identifier or a gateway URL.
    pub fn parse_reference(input: &str) -> Result<Self, CidError> {
        let trimmed = input.trim();
        let candidate = if trimmed.starts_with("http") {
            trimmed.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
        } else {
            trimmed
        };
        Self::new(candidate)
    }

    /// Compute a CIDv0-style identifier (base58 sha2-256 multihash) of `data`.
    pub fn v0_from_data(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut multihash = Vec::with_capacity(2 + digest.len());
        multihash.push(MULTIHASH_SHA2_256);
        multihash.push(MULTIHASH_SHA2_256_LEN);
        multihash.extend_from_slice(&digest);
        Self(bs58::encode(multihash).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_reference(s)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v0_identifier_shape() {
        let cid = Cid::v0_from_data(b"hello world");
        assert!(cid.as_str().starts_with("Qm"));
        assert_eq!(cid.as_str().len(), 46);
        assert_eq!(cid, Cid::v0_from_data(b"hello world"));
        assert_ne!(cid, Cid::v0_from_data(b"hello world!"));
    }

    #[test]
    fn test_gateway_url_reduced_to_identifier() {
        let cid = Cid::parse_reference("https://example.mypinata.cloud/ipfs/QmAbc123").unwrap();
        assert_eq!(cid.as_str(), "QmAbc123");

        let trailing = Cid::parse_reference("https://example.mypinata.cloud/ipfs/QmAbc123/").unwrap();
        assert_eq!(trailing.as_str(), "QmAbc123");
    }

    #[test]
    fn test_new_keeps_value_verbatim() {
        let cid = Cid::new("bafyMixedCase").unwrap();
        assert_eq!(cid.as_str(), "bafyMixedCase");
        assert_eq!(Cid::new(""), Err(CidError::Empty));
        assert_eq!(Cid::new("a b"), Err(CidError::InvalidCharacter(' ')));
    }
}

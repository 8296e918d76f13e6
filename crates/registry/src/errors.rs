//! Error types for the publication registry

use researchchain_types::{Address, Amount, PublicationId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Publication not found: {id}")]
    PublicationNotFound { id: PublicationId },

    #[error("Invalid publication draft: {0}")]
    InvalidDraft(String),

    #[error("Unauthorized: {caller} does not own publication {id}")]
    Unauthorized { caller: Address, id: PublicationId },

    #[error("Publication {id} is open access; it cannot carry a price")]
    NotPaid { id: PublicationId },

    #[error("Insufficient spend authorization: required {required}, approved {approved}")]
    InsufficientAllowance { required: Amount, approved: Amount },

    #[error("Out of gas: call needs {required}, limit {limit}")]
    OutOfGas { required: u64, limit: u64 },

    #[error("Registry unavailable: {0}")]
    Unavailable(String),

    #[error("Registry storage error: {0}")]
    StorageError(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

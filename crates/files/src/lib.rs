//! ResearchChain content storage
//!
//! Content-addressed storage for submitted papers and review documents.
//! The store owns the bytes; callers only keep the returned [`Cid`].
//!
//! Backends:
//! - [`MemoryContentStore`] for tests and embedded use
//! - [`LocalContentStore`] for a content directory on disk
//! - [`PinataContentStore`] for a Pinata-compatible IPFS pinning service

pub mod errors;
pub mod local;
pub mod memory;
pub mod pinata;
pub mod store;

pub use errors::*;
pub use local::LocalContentStore;
pub use memory::MemoryContentStore;
pub use pinata::{PinataConfig, PinataContentStore};
pub use store::{ContentKind, ContentStore, ContentUpload, StoredContent};

pub use researchchain_types::Cid;

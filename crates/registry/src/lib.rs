//! Publication Registry
//!
//! The registry holds publication records and their optional access prices.
//! On a deployed network this is a contract; [`MemoryPublicationRegistry`]
//! implements the same interface in process and can persist JSON snapshots.

pub mod errors;
pub mod memory;
pub mod registry;
pub mod snapshot;

pub use errors::*;
pub use memory::MemoryPublicationRegistry;
pub use registry::{CallOptions, PublicationRegistry};
pub use snapshot::RegistrySnapshot;

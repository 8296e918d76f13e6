//! ResearchChain shared types
//!
//! Identities, token amounts, content identifiers and the publication record
//! shared by the content store, the registry and the submission flow.

pub mod address;
pub mod amount;
pub mod cid;
pub mod publication;

pub use address::*;
pub use amount::*;
pub use cid::*;
pub use publication::*;

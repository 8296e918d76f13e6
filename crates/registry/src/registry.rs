//! Registry interface.

use crate::errors::Result;
use async_trait::async_trait;
use researchchain_types::{
    AccessPriceRecord, Address, Amount, Publication, PublicationDraft, PublicationId,
};
use serde::{Deserialize, Serialize};

/// Per-call transaction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOptions {
    pub gas_limit: u64,
}

impl CallOptions {
    pub const fn with_gas_limit(gas_limit: u64) -> Self {
        Self { gas_limit }
    }
}

/// Publication registry contract.
///
/// Write calls are signed by `caller`. `register_publication` returns the
/// identifier it assigned, so callers never need to infer it from the counter.
#[async_trait]
pub trait PublicationRegistry: Send + Sync {
    /// Record a new publication and return its identifier.
    async fn register_publication(
        &self,
        caller: &Address,
        draft: PublicationDraft,
        options: CallOptions,
    ) -> Result<PublicationId>;

    /// Identifier the next registration will receive.
    async fn next_publication_id(&self) -> Result<PublicationId>;

    async fn get_publication(&self, id: PublicationId) -> Result<Publication>;

    /// Publications registered by `publisher`, newest first.
    async fn publications_by_publisher(&self, publisher: &Address) -> Result<Vec<Publication>>;

    /// Allow the registry to move up to `amount` of the caller's tokens.
    async fn authorize_spend(
        &self,
        caller: &Address,
        amount: Amount,
        options: CallOptions,
    ) -> Result<()>;

    /// Attach an access price to a paid publication owned by `caller`.
    async fn set_access_cost(
        &self,
        caller: &Address,
        id: PublicationId,
        cost: Amount,
        options: CallOptions,
    ) -> Result<AccessPriceRecord>;

    /// Price record for `id`; `None` means free access.
    async fn access_cost(&self, id: PublicationId) -> Result<Option<AccessPriceRecord>>;
}

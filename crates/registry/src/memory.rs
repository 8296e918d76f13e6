//! In-process publication registry.

use crate::errors::*;
use crate::registry::{CallOptions, PublicationRegistry};
use crate::snapshot::RegistrySnapshot;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use researchchain_types::{
    AccessMode, AccessPriceRecord, Address, Amount, Publication, PublicationDraft, PublicationId,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Gas charged for a publication registration.
pub const REGISTER_GAS_COST: u64 = 250_000;
/// Gas charged for a spend authorization.
pub const AUTHORIZE_GAS_COST: u64 = 46_000;
/// Gas charged for setting an access price.
pub const SET_COST_GAS_COST: u64 = 60_000;

/// First identifier handed out by a fresh registry.
pub const FIRST_PUBLICATION_ID: u64 = 1;

#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    pub(crate) next_id: u64,
    pub(crate) publications: BTreeMap<PublicationId, Publication>,
    pub(crate) by_publisher: HashMap<Address, Vec<PublicationId>>,
    pub(crate) allowances: HashMap<Address, Amount>,
    pub(crate) access_costs: HashMap<PublicationId, AccessPriceRecord>,
}

impl RegistryState {
    fn empty() -> Self {
        Self {
            next_id: FIRST_PUBLICATION_ID,
            ..Default::default()
        }
    }
}

/// In-memory publication registry.
///
/// All state sits behind one lock so identifier assignment and indexing
/// happen atomically for concurrent submitters.
#[derive(Debug, Clone)]
pub struct MemoryPublicationRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl Default for MemoryPublicationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPublicationRegistry {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::empty())),
        }
    }

    /// Number of registered publications.
    pub fn publication_count(&self) -> usize {
        self.state.read().publications.len()
    }

    /// Current spend authorization of `owner`.
    pub fn allowance(&self, owner: &Address) -> Amount {
        self.state
            .read()
            .allowances
            .get(owner)
            .copied()
            .unwrap_or_default()
    }

    /// Export a consistent copy of the registry state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(&self.state.read())
    }

    /// Rebuild a registry from a snapshot.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self> {
        let state = snapshot.restore()?;
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    fn charge_gas(options: CallOptions, required: u64) -> Result<()> {
        if options.gas_limit < required {
            return Err(RegistryError::OutOfGas {
                required,
                limit: options.gas_limit,
            });
        }
        Ok(())
    }

    fn validate_draft(caller: &Address, draft: &PublicationDraft) -> Result<()> {
        if draft.title.trim().is_empty() {
            return Err(RegistryError::InvalidDraft("title is empty".into()));
        }

        match draft.authors.first() {
            Some(first) if first == caller => {}
            Some(first) => {
                return Err(RegistryError::InvalidDraft(format!(
                    "first author {first} is not the caller {caller}"
                )))
            }
            None => return Err(RegistryError::InvalidDraft("author list is empty".into())),
        }

        let mut seen = HashSet::new();
        if !draft.authors.iter().all(|author| seen.insert(author)) {
            return Err(RegistryError::InvalidDraft("duplicate author".into()));
        }

        if draft.access_mode == AccessMode::Open && draft.price.is_some() {
            return Err(RegistryError::InvalidDraft(
                "open access publication cannot carry a price".into(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl PublicationRegistry for MemoryPublicationRegistry {
    async fn register_publication(
        &self,
        caller: &Address,
        draft: PublicationDraft,
        options: CallOptions,
    ) -> Result<PublicationId> {
        Self::charge_gas(options, REGISTER_GAS_COST)?;
        Self::validate_draft(caller, &draft)?;

        let id = {
            let mut state = self.state.write();
            let id = PublicationId(state.next_id);
            state.next_id += 1;

            let publication = Publication::from_draft(id, *caller, draft, Utc::now());
            state.publications.insert(id, publication);
            state.by_publisher.entry(*caller).or_default().push(id);
            id
        };

        info!(%id, publisher = %caller, "publication registered");
        Ok(id)
    }

    async fn next_publication_id(&self) -> Result<PublicationId> {
        Ok(PublicationId(self.state.read().next_id))
    }

    async fn get_publication(&self, id: PublicationId) -> Result<Publication> {
        let state = self.state.read();
        state
            .publications
            .get(&id)
            .cloned()
            .ok_or(RegistryError::PublicationNotFound { id })
    }

    async fn publications_by_publisher(&self, publisher: &Address) -> Result<Vec<Publication>> {
        let state = self.state.read();
        let ids = match state.by_publisher.get(publisher) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };

        Ok(ids
            .iter()
            .rev()
            .filter_map(|id| state.publications.get(id).cloned())
            .collect())
    }

    async fn authorize_spend(
        &self,
        caller: &Address,
        amount: Amount,
        options: CallOptions,
    ) -> Result<()> {
        Self::charge_gas(options, AUTHORIZE_GAS_COST)?;

        {
            let mut state = self.state.write();
            state.allowances.insert(*caller, amount);
        }

        debug!(owner = %caller, %amount, "spend authorized");
        Ok(())
    }

    async fn set_access_cost(
        &self,
        caller: &Address,
        id: PublicationId,
        cost: Amount,
        options: CallOptions,
    ) -> Result<AccessPriceRecord> {
        Self::charge_gas(options, SET_COST_GAS_COST)?;

        let mut state = self.state.write();
        let publication = state
            .publications
            .get(&id)
            .ok_or(RegistryError::PublicationNotFound { id })?;

        if publication.publisher != *caller {
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                id,
            });
        }
        if publication.access_mode != AccessMode::Paid {
            return Err(RegistryError::NotPaid { id });
        }

        let approved = state.allowances.get(caller).copied().unwrap_or_default();
        if approved < cost {
            return Err(RegistryError::InsufficientAllowance {
                required: cost,
                approved,
            });
        }

        let record = AccessPriceRecord {
            publication_id: id,
            cost,
            set_by: *caller,
            set_at: Utc::now(),
        };
        state.access_costs.insert(id, record.clone());

        info!(%id, %cost, "access cost set");
        Ok(record)
    }

    async fn access_cost(&self, id: PublicationId) -> Result<Option<AccessPriceRecord>> {
        let state = self.state.read();
        if !state.publications.contains_key(&id) {
            return Err(RegistryError::PublicationNotFound { id });
        }
        Ok(state.access_costs.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use researchchain_types::Cid;

    const GAS: CallOptions = CallOptions::with_gas_limit(500_000);

    fn alice() -> Address {
        Address::new([0xa1; 20])
    }

    fn bob() -> Address {
        Address::new([0xb0; 20])
    }

    fn draft(publisher: Address, mode: AccessMode) -> PublicationDraft {
        PublicationDraft {
            title: "On registries".into(),
            authors: vec![publisher],
            abstract_text: "An abstract.".into(),
            keywords: vec!["ledgers".into()],
            content: Cid::v0_from_data(b"paper"),
            access_mode: mode,
            price: match mode {
                AccessMode::Open => None,
                AccessMode::Paid => Some(Amount::from_tokens(5)),
            },
        }
    }

    #[tokio::test]
    async fn test_register_returns_sequential_ids() {
        let registry = MemoryPublicationRegistry::new();
        assert_eq!(registry.next_publication_id().await.unwrap(), PublicationId(1));

        let first = registry
            .register_publication(&alice(), draft(alice(), AccessMode::Open), GAS)
            .await
            .unwrap();
        let second = registry
            .register_publication(&bob(), draft(bob(), AccessMode::Open), GAS)
            .await
            .unwrap();

        assert_eq!(first, PublicationId(1));
        assert_eq!(second, PublicationId(2));
        assert_eq!(registry.next_publication_id().await.unwrap(), PublicationId(3));

        let stored = registry.get_publication(first).await.unwrap();
        assert_eq!(stored.publisher, alice());
        assert_eq!(stored.content, Cid::v0_from_data(b"paper"));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_drafts() {
        let registry = MemoryPublicationRegistry::new();

        let mut wrong_first = draft(alice(), AccessMode::Open);
        wrong_first.authors = vec![bob(), alice()];
        assert!(matches!(
            registry.register_publication(&alice(), wrong_first, GAS).await,
            Err(RegistryError::InvalidDraft(_))
        ));

        let mut duplicate = draft(alice(), AccessMode::Open);
        duplicate.authors = vec![alice(), bob(), bob()];
        assert!(matches!(
            registry.register_publication(&alice(), duplicate, GAS).await,
            Err(RegistryError::InvalidDraft(_))
        ));

        let mut priced_open = draft(alice(), AccessMode::Open);
        priced_open.price = Some(Amount::from_tokens(1));
        assert!(matches!(
            registry.register_publication(&alice(), priced_open, GAS).await,
            Err(RegistryError::InvalidDraft(_))
        ));

        assert_eq!(registry.publication_count(), 0);
    }

    #[tokio::test]
    async fn test_register_out_of_gas() {
        let registry = MemoryPublicationRegistry::new();
        let result = registry
            .register_publication(
                &alice(),
                draft(alice(), AccessMode::Open),
                CallOptions::with_gas_limit(1_000),
            )
            .await;
        assert!(matches!(result, Err(RegistryError::OutOfGas { .. })));
        assert_eq!(registry.next_publication_id().await.unwrap(), PublicationId(1));
    }

    #[tokio::test]
    async fn test_publications_by_publisher_newest_first() {
        let registry = MemoryPublicationRegistry::new();
        for _ in 0..3 {
            registry
                .register_publication(&alice(), draft(alice(), AccessMode::Open), GAS)
                .await
                .unwrap();
        }
        registry
            .register_publication(&bob(), draft(bob(), AccessMode::Open), GAS)
            .await
            .unwrap();

        let mine = registry.publications_by_publisher(&alice()).await.unwrap();
        let ids: Vec<u64> = mine.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(registry
            .publications_by_publisher(&Address::new([9; 20]))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_pricing_requires_authorization() {
        let registry = MemoryPublicationRegistry::new();
        let id = registry
            .register_publication(&alice(), draft(alice(), AccessMode::Paid), GAS)
            .await
            .unwrap();

        let cost = Amount::from_tokens(5);
        assert!(matches!(
            registry.set_access_cost(&alice(), id, cost, GAS).await,
            Err(RegistryError::InsufficientAllowance { .. })
        ));
        assert_eq!(registry.access_cost(id).await.unwrap(), None);

        registry.authorize_spend(&alice(), cost, GAS).await.unwrap();
        assert_eq!(registry.allowance(&alice()), cost);

        let record = registry.set_access_cost(&alice(), id, cost, GAS).await.unwrap();
        assert_eq!(record.cost, cost);
        assert_eq!(registry.access_cost(id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_pricing_rules() {
        let registry = MemoryPublicationRegistry::new();
        let open = registry
            .register_publication(&alice(), draft(alice(), AccessMode::Open), GAS)
            .await
            .unwrap();
        let paid = registry
            .register_publication(&alice(), draft(alice(), AccessMode::Paid), GAS)
            .await
            .unwrap();
        let cost = Amount::from_tokens(2);
        registry.authorize_spend(&alice(), cost, GAS).await.unwrap();
        registry.authorize_spend(&bob(), cost, GAS).await.unwrap();

        assert!(matches!(
            registry.set_access_cost(&alice(), open, cost, GAS).await,
            Err(RegistryError::NotPaid { .. })
        ));
        assert!(matches!(
            registry.set_access_cost(&bob(), paid, cost, GAS).await,
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(matches!(
            registry
                .set_access_cost(&alice(), PublicationId(99), cost, GAS)
                .await,
            Err(RegistryError::PublicationNotFound { .. })
        ));
        assert!(matches!(
            registry.access_cost(PublicationId(99)).await,
            Err(RegistryError::PublicationNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_get_distinct_ids() {
        let registry = MemoryPublicationRegistry::new();
        let tasks = (0..16u8).map(|i| {
            let registry = registry.clone();
            async move {
                let who = Address::new([i; 20]);
                registry
                    .register_publication(&who, draft(who, AccessMode::Open), GAS)
                    .await
                    .unwrap()
            }
        });

        let mut ids = futures::future::join_all(tasks).await;
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}

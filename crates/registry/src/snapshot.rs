//! JSON snapshots of the in-memory registry.

use crate::errors::{RegistryError, Result};
use crate::memory::{MemoryPublicationRegistry, RegistryState, FIRST_PUBLICATION_ID};
use researchchain_types::{AccessPriceRecord, Address, Amount, Publication, PublicationId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: Address,
    pub amount: Amount,
}

/// Serialisable registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub next_id: u64,
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub allowances: Vec<AllowanceEntry>,
    #[serde(default)]
    pub access_costs: Vec<AccessPriceRecord>,
}

impl RegistrySnapshot {
    pub(crate) fn capture(state: &RegistryState) -> Self {
        let mut allowances: Vec<AllowanceEntry> = state
            .allowances
            .iter()
            .map(|(owner, amount)| AllowanceEntry {
                owner: *owner,
                amount: *amount,
            })
            .collect();
        allowances.sort_by_key(|entry| entry.owner);

        let mut access_costs: Vec<AccessPriceRecord> =
            state.access_costs.values().cloned().collect();
        access_costs.sort_by_key(|record| record.publication_id);

        Self {
            version: SNAPSHOT_VERSION,
            next_id: state.next_id,
            publications: state.publications.values().cloned().collect(),
            allowances,
            access_costs,
        }
    }

    pub(crate) fn restore(self) -> Result<RegistryState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(RegistryError::StorageError(anyhow::anyhow!(
                "unsupported snapshot version {}",
                self.version
            )));
        }

        let mut state = RegistryState {
            next_id: self.next_id.max(FIRST_PUBLICATION_ID),
            ..Default::default()
        };

        for publication in self.publications {
            if publication.id.value() >= state.next_id {
                return Err(RegistryError::StorageError(anyhow::anyhow!(
                    "publication {} is not below next id {}",
                    publication.id,
                    state.next_id
                )));
            }
            let (id, publisher) = (publication.id, publication.publisher);
            if state.publications.insert(id, publication).is_some() {
                return Err(RegistryError::StorageError(anyhow::anyhow!(
                    "publication {id} appears more than once"
                )));
            }
            state.by_publisher.entry(publisher).or_default().push(id);
        }
        // Publisher indexes stay in registration order.
        for ids in state.by_publisher.values_mut() {
            ids.sort();
        }

        for entry in self.allowances {
            state.allowances.insert(entry.owner, entry.amount);
        }

        for record in self.access_costs {
            let id: PublicationId = record.publication_id;
            if !state.publications.contains_key(&id) {
                return Err(RegistryError::PublicationNotFound { id });
            }
            state.access_costs.insert(id, record);
        }

        Ok(state)
    }
}

impl MemoryPublicationRegistry {
    /// Load a registry from `path`, or start empty when the file does not exist.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read(path).await {
            Ok(raw) => {
                let snapshot: RegistrySnapshot = serde_json::from_slice(&raw)?;
                let registry = Self::from_snapshot(snapshot)?;
                info!(
                    path = %path.display(),
                    publications = registry.publication_count(),
                    "registry snapshot loaded"
                );
                Ok(registry)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the current state to `path`, replacing any previous snapshot.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot();
        let raw = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).await?;
        fs::rename(&tmp, path).await?;

        info!(path = %path.display(), publications = snapshot.publications.len(), "registry snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CallOptions, PublicationRegistry};
    use researchchain_types::{AccessMode, Cid, PublicationDraft};

    const GAS: CallOptions = CallOptions::with_gas_limit(500_000);

    async fn seeded_registry() -> (MemoryPublicationRegistry, Address, PublicationId) {
        let registry = MemoryPublicationRegistry::new();
        let owner = Address::new([4u8; 20]);
        let draft = PublicationDraft {
            title: "Snapshot semantics".into(),
            authors: vec![owner],
            abstract_text: "State survives restarts.".into(),
            keywords: vec!["storage".into()],
            content: Cid::v0_from_data(b"snapshot paper"),
            access_mode: AccessMode::Paid,
            price: Some(Amount::from_tokens(3)),
        };
        let id = registry.register_publication(&owner, draft, GAS).await.unwrap();
        registry
            .authorize_spend(&owner, Amount::from_tokens(3), GAS)
            .await
            .unwrap();
        registry
            .set_access_cost(&owner, id, Amount::from_tokens(3), GAS)
            .await
            .unwrap();
        (registry, owner, id)
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("registry.json");
        let (registry, owner, id) = seeded_registry().await;

        registry.save(&path).await.unwrap();
        let loaded = MemoryPublicationRegistry::load_or_default(&path)
            .await
            .unwrap();

        assert_eq!(loaded.snapshot(), registry.snapshot());
        assert_eq!(loaded.next_publication_id().await.unwrap(), PublicationId(2));
        assert_eq!(
            loaded.publications_by_publisher(&owner).await.unwrap().len(),
            1
        );
        assert_eq!(
            loaded.access_cost(id).await.unwrap().unwrap().cost,
            Amount::from_tokens(3)
        );
    }

    #[tokio::test]
    async fn test_missing_file_gives_empty_registry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = MemoryPublicationRegistry::load_or_default(&dir.path().join("none.json"))
            .await
            .unwrap();
        assert_eq!(registry.publication_count(), 0);
        assert_eq!(
            registry.next_publication_id().await.unwrap(),
            PublicationId(FIRST_PUBLICATION_ID)
        );
    }

    #[tokio::test]
    async fn test_restore_rejects_inconsistent_snapshot() {
        let (registry, _, _) = seeded_registry().await;
        let mut snapshot = registry.snapshot();
        snapshot.next_id = 1;
        assert!(MemoryPublicationRegistry::from_snapshot(snapshot).is_err());

        let mut snapshot = registry.snapshot();
        snapshot.version = 99;
        assert!(MemoryPublicationRegistry::from_snapshot(snapshot).is_err());
    }

    #[tokio::test]
    async fn test_restore_rejects_duplicate_publication_ids() {
        let (registry, _, _) = seeded_registry().await;
        let mut snapshot = registry.snapshot();
        let repeated = snapshot.publications[0].clone();
        snapshot.publications.push(repeated);

        assert!(matches!(
            MemoryPublicationRegistry::from_snapshot(snapshot),
            Err(RegistryError::StorageError(_))
        ));
    }
}

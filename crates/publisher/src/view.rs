//! Read side: publications together with the access policy in effect.

use researchchain_registry::{PublicationRegistry, RegistryError};
use researchchain_types::{AccessMode, AccessPriceRecord, Address, Publication, PublicationId};
use serde::{Deserialize, Serialize};

/// A registered publication and the access policy readers actually get.
///
/// `publication.access_mode` is what the submitter asked for. Access is paid
/// only when a price record exists, so a publication whose pricing failed
/// shows up here as open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationView {
    pub publication: Publication,
    pub effective_access: AccessMode,
    pub price: Option<AccessPriceRecord>,
}

/// Access mode implied by an optional price record.
pub fn effective_mode(record: Option<&AccessPriceRecord>) -> AccessMode {
    if record.is_some() {
        AccessMode::Paid
    } else {
        AccessMode::Open
    }
}

pub async fn view_publication(
    registry: &dyn PublicationRegistry,
    id: PublicationId,
) -> Result<PublicationView, RegistryError> {
    let publication = registry.get_publication(id).await?;
    with_effective_access(registry, publication).await
}

/// Publications of `publisher`, newest first, each with its effective access.
pub async fn list_publications(
    registry: &dyn PublicationRegistry,
    publisher: &Address,
) -> Result<Vec<PublicationView>, RegistryError> {
    let publications = registry.publications_by_publisher(publisher).await?;
    let mut views = Vec::with_capacity(publications.len());
    for publication in publications {
        views.push(with_effective_access(registry, publication).await?);
    }
    Ok(views)
}

async fn with_effective_access(
    registry: &dyn PublicationRegistry,
    publication: Publication,
) -> Result<PublicationView, RegistryError> {
    let price = registry.access_cost(publication.id).await?;
    Ok(PublicationView {
        effective_access: effective_mode(price.as_ref()),
        publication,
        price,
    })
}

//! The submission step sequence.

use crate::error::{PricingError, SubmissionError};
use crate::form::{AccessRequest, SubmissionForm, ValidatedSubmission};
use crate::report::{AccessOutcome, StepOutcome, StepRecord, SubmissionReport, SubmissionStep};
use crate::view::{effective_mode, list_publications, view_publication, PublicationView};
use chrono::Utc;
use researchchain_files::{ContentStore, ContentUpload, StoredContent};
use researchchain_registry::{CallOptions, PublicationRegistry, RegistryError};
use researchchain_types::{
    AccessMode, AccessPriceRecord, Address, Amount, Publication, PublicationDraft, PublicationId,
};
use researchchain_wallet::WalletSession;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Map the result of the pricing step to the access outcome reported to the
/// submitter. A pricing failure never fails the submission.
pub fn settle_access(
    request: AccessRequest,
    pricing: Option<Result<AccessPriceRecord, PricingError>>,
) -> AccessOutcome {
    match (request, pricing) {
        (AccessRequest::Open, _) | (AccessRequest::Paid(_), None) => AccessOutcome::Open,
        (AccessRequest::Paid(_), Some(Ok(record))) => AccessOutcome::Paid { record },
        (AccessRequest::Paid(requested), Some(Err(warning))) => {
            AccessOutcome::FallbackOpen { requested, warning }
        }
    }
}

/// Orchestrates upload, registration and pricing for one submission at a time.
///
/// The flow itself is stateless; concurrent submissions are independent and
/// rely on the registry to hand out distinct identifiers.
#[derive(Clone)]
pub struct PublicationFlow {
    store: Arc<dyn ContentStore>,
    registry: Arc<dyn PublicationRegistry>,
}

impl PublicationFlow {
    pub fn new(store: Arc<dyn ContentStore>, registry: Arc<dyn PublicationRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<dyn PublicationRegistry> {
        &self.registry
    }

    /// Run the full submission for `form` under `session`.
    #[instrument(skip_all, fields(title = %form.title))]
    pub async fn submit(
        &self,
        session: &WalletSession,
        form: SubmissionForm,
    ) -> Result<SubmissionReport, SubmissionError> {
        let mut steps = Vec::with_capacity(5);

        let submission = form.validate()?;
        steps.push(completed(SubmissionStep::Validate));

        let submitter = session.signer().map_err(SubmissionError::Authorization)?;
        steps.push(completed(SubmissionStep::Authorize));

        let content = self.upload(&submission).await?;
        steps.push(completed(SubmissionStep::Upload));

        let publication = self.register(session, submitter, &submission, &content).await?;
        steps.push(completed(SubmissionStep::Register));

        let pricing = match submission.access {
            AccessRequest::Open => None,
            AccessRequest::Paid(price) => {
                Some(self.price(session, submitter, publication.id, price).await)
            }
        };
        steps.push(StepRecord {
            step: SubmissionStep::Price,
            outcome: match &pricing {
                None => StepOutcome::Skipped,
                Some(Ok(_)) => StepOutcome::Completed,
                Some(Err(e)) => StepOutcome::Degraded(e.to_string()),
            },
        });

        let access = settle_access(submission.access, pricing);
        if let AccessOutcome::FallbackOpen { requested, warning } = &access {
            warn!(
                id = %publication.id,
                %requested,
                %warning,
                "publication registered but priced access could not be set; it is free to read"
            );
        }

        info!(
            id = %publication.id,
            cid = %publication.content,
            access = %access.effective_mode(),
            "submission finished"
        );

        Ok(SubmissionReport {
            publication,
            content,
            access,
            steps,
        })
    }

    async fn upload(
        &self,
        submission: &ValidatedSubmission,
    ) -> Result<StoredContent, SubmissionError> {
        let upload = ContentUpload::paper(&submission.file.name, submission.file.bytes.clone());
        let stored = self
            .store
            .upload(upload)
            .await
            .map_err(SubmissionError::Storage)?;
        info!(cid = %stored.cid, size = stored.size_bytes, "paper uploaded");
        Ok(stored)
    }

    async fn register(
        &self,
        session: &WalletSession,
        submitter: Address,
        submission: &ValidatedSubmission,
        content: &StoredContent,
    ) -> Result<Publication, SubmissionError> {
        let draft = PublicationDraft {
            title: submission.title.clone(),
            authors: submission.author_list(submitter),
            abstract_text: submission.abstract_text.clone(),
            keywords: submission.keywords.clone(),
            content: content.cid.clone(),
            access_mode: submission.access.mode(),
            price: submission.access.price(),
        };
        let options = CallOptions::with_gas_limit(session.gas_limits().publish);

        let id = self
            .registry
            .register_publication(&submitter, draft.clone(), options)
            .await
            .map_err(SubmissionError::Registration)?;

        // The publication exists from here on; a failed read-back must not
        // turn the submission into a failure.
        match self.registry.get_publication(id).await {
            Ok(publication) => Ok(publication),
            Err(e) => {
                warn!(%id, error = %e, "could not read back registered publication");
                Ok(Publication::from_draft(id, submitter, draft, Utc::now()))
            }
        }
    }

    async fn price(
        &self,
        session: &WalletSession,
        submitter: Address,
        id: PublicationId,
        price: Amount,
    ) -> Result<AccessPriceRecord, PricingError> {
        let options = CallOptions::with_gas_limit(session.gas_limits().pricing);

        self.registry
            .authorize_spend(&submitter, price, options)
            .await
            .map_err(|e| PricingError::Authorization(e.to_string()))?;

        self.registry
            .set_access_cost(&submitter, id, price, options)
            .await
            .map_err(|e| PricingError::SetCost(e.to_string()))
    }

    /// Access policy currently in effect for `id`: paid only when a price
    /// record exists.
    pub async fn effective_access(
        &self,
        id: PublicationId,
    ) -> Result<(AccessMode, Option<AccessPriceRecord>), RegistryError> {
        let record = self.registry.access_cost(id).await?;
        Ok((effective_mode(record.as_ref()), record))
    }

    pub async fn publication(&self, id: PublicationId) -> Result<PublicationView, RegistryError> {
        view_publication(self.registry.as_ref(), id).await
    }

    pub async fn publications_of(
        &self,
        publisher: &Address,
    ) -> Result<Vec<PublicationView>, RegistryError> {
        list_publications(self.registry.as_ref(), publisher).await
    }
}

fn completed(step: SubmissionStep) -> StepRecord {
    StepRecord {
        step,
        outcome: StepOutcome::Completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AccessPriceRecord {
        AccessPriceRecord {
            publication_id: PublicationId(1),
            cost: Amount::from_tokens(5),
            set_by: Address::new([1u8; 20]),
            set_at: Utc::now(),
        }
    }

    #[test]
    fn test_settle_open() {
        assert_eq!(settle_access(AccessRequest::Open, None), AccessOutcome::Open);
    }

    #[test]
    fn test_settle_paid_success() {
        let record = record();
        let outcome = settle_access(
            AccessRequest::Paid(Amount::from_tokens(5)),
            Some(Ok(record.clone())),
        );
        assert_eq!(outcome, AccessOutcome::Paid { record });
        assert_eq!(outcome.effective_mode(), AccessMode::Paid);
    }

    #[test]
    fn test_settle_pricing_failure_falls_back_to_open() {
        let warning = PricingError::SetCost("reverted".into());
        let outcome = settle_access(
            AccessRequest::Paid(Amount::from_tokens(5)),
            Some(Err(warning.clone())),
        );
        assert_eq!(
            outcome,
            AccessOutcome::FallbackOpen {
                requested: Amount::from_tokens(5),
                warning
            }
        );
        assert_eq!(outcome.effective_mode(), AccessMode::Open);
    }
}

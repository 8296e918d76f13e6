//! Error taxonomy of the submission flow.

use crate::form::ValidationError;
use crate::report::SubmissionStep;
use researchchain_files::ContentError;
use researchchain_registry::RegistryError;
use researchchain_wallet::WalletError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures that abort a submission. None of them leave a registered
/// publication behind.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("submission is incomplete: {0}")]
    Validation(#[from] ValidationError),

    #[error("no authorized wallet session: {0}")]
    Authorization(#[source] WalletError),

    #[error("paper upload failed: {0}")]
    Storage(#[source] ContentError),

    #[error("publication registration failed: {0}")]
    Registration(#[source] RegistryError),
}

impl SubmissionError {
    /// Step at which the flow stopped.
    pub fn step(&self) -> SubmissionStep {
        match self {
            SubmissionError::Validation(_) => SubmissionStep::Validate,
            SubmissionError::Authorization(_) => SubmissionStep::Authorize,
            SubmissionError::Storage(_) => SubmissionStep::Upload,
            SubmissionError::Registration(_) => SubmissionStep::Register,
        }
    }

    /// Whether re-submitting the same form unchanged can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionError::Storage(_) | SubmissionError::Registration(_)
        )
    }
}

/// Failure while attaching a price to a registered paid publication.
///
/// Never aborts the flow; it is carried in the report as a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingError {
    #[error("spend authorization failed: {0}")]
    Authorization(String),

    #[error("setting the access cost failed: {0}")]
    SetCost(String),
}

//! Typed outcome of a submission.

use crate::error::PricingError;
use researchchain_files::StoredContent;
use researchchain_types::{AccessMode, AccessPriceRecord, Amount, Publication};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStep {
    Validate,
    Authorize,
    Upload,
    Register,
    Price,
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SubmissionStep::Validate => "validate",
            SubmissionStep::Authorize => "authorize",
            SubmissionStep::Upload => "upload",
            SubmissionStep::Register => "register",
            SubmissionStep::Price => "price",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Completed,
    Skipped,
    /// Step failed without failing the submission.
    Degraded(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: SubmissionStep,
    pub outcome: StepOutcome,
}

/// Access policy in effect after the flow finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessOutcome {
    Open,
    Paid { record: AccessPriceRecord },
    /// Paid access was requested but no price could be attached, so the
    /// publication is readable for free.
    FallbackOpen {
        requested: Amount,
        warning: PricingError,
    },
}

impl AccessOutcome {
    pub fn effective_mode(&self) -> AccessMode {
        match self {
            AccessOutcome::Paid { .. } => AccessMode::Paid,
            AccessOutcome::Open | AccessOutcome::FallbackOpen { .. } => AccessMode::Open,
        }
    }
}

/// Result of a submission that reached the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub publication: Publication,
    pub content: StoredContent,
    pub access: AccessOutcome,
    pub steps: Vec<StepRecord>,
}

impl SubmissionReport {
    /// Warning to surface to the submitter, if pricing fell back to free access.
    pub fn warning(&self) -> Option<&PricingError> {
        match &self.access {
            AccessOutcome::FallbackOpen { warning, .. } => Some(warning),
            _ => None,
        }
    }

    pub fn is_free_access(&self) -> bool {
        self.access.effective_mode() == AccessMode::Open
    }

    pub fn outcome_of(&self, step: SubmissionStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }
}

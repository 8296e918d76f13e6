//! Submission form and its validation.

use researchchain_types::{AccessMode, Address, Amount};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Paper file selected by the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PaperFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Raw caller input. Every field may be missing until validated.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub file: Option<PaperFile>,
    pub access_mode: Option<AccessMode>,
    pub price: Option<Amount>,
    pub additional_authors: Vec<Address>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("abstract is required")]
    MissingAbstract,

    #[error("a paper file is required")]
    MissingFile,

    #[error("paper file {name} is empty")]
    EmptyFile { name: String },

    #[error("access mode is required")]
    MissingAccessMode,

    #[error("paid access requires a price")]
    MissingPrice,

    #[error("paid access requires a price above zero")]
    ZeroPrice,
}

/// Access policy requested by a validated submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequest {
    Open,
    Paid(Amount),
}

impl AccessRequest {
    pub fn mode(&self) -> AccessMode {
        match self {
            AccessRequest::Open => AccessMode::Open,
            AccessRequest::Paid(_) => AccessMode::Paid,
        }
    }

    pub fn price(&self) -> Option<Amount> {
        match self {
            AccessRequest::Open => None,
            AccessRequest::Paid(price) => Some(*price),
        }
    }
}

/// A form that passed validation; only this type reaches the side-effecting steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub file: PaperFile,
    pub access: AccessRequest,
    pub additional_authors: Vec<Address>,
}

impl ValidatedSubmission {
    /// Author list with `submitter` first, followed by the additional authors
    /// in input order. Repeats of the submitter and duplicates are dropped.
    pub fn author_list(&self, submitter: Address) -> Vec<Address> {
        let mut seen = HashSet::from([submitter]);
        let mut authors = vec![submitter];
        authors.extend(
            self.additional_authors
                .iter()
                .copied()
                .filter(|author| seen.insert(*author)),
        );
        authors
    }
}

impl SubmissionForm {
    /// Split a comma separated keyword string as typed in the upload form.
    pub fn parse_keywords(raw: &str) -> Vec<String> {
        raw.split(',').map(str::to_string).collect()
    }

    pub fn validate(self) -> Result<ValidatedSubmission, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let abstract_text = self.abstract_text.trim().to_string();
        if abstract_text.is_empty() {
            return Err(ValidationError::MissingAbstract);
        }

        let file = self.file.ok_or(ValidationError::MissingFile)?;
        if file.bytes.is_empty() {
            return Err(ValidationError::EmptyFile { name: file.name });
        }

        let access = match self.access_mode.ok_or(ValidationError::MissingAccessMode)? {
            AccessMode::Open => {
                if self.price.is_some() {
                    debug!("ignoring price on open access submission");
                }
                AccessRequest::Open
            }
            AccessMode::Paid => match self.price {
                None => return Err(ValidationError::MissingPrice),
                Some(price) if price.is_zero() => return Err(ValidationError::ZeroPrice),
                Some(price) => AccessRequest::Paid(price),
            },
        };

        Ok(ValidatedSubmission {
            title,
            abstract_text,
            keywords: normalize_keywords(self.keywords),
            file,
            access,
            additional_authors: self.additional_authors,
        })
    }
}

/// Trim, drop empties and de-duplicate case-insensitively, keeping the first spelling.
fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .collect()
}

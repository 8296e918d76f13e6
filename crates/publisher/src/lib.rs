//! Paper submission flow
//!
//! Turns a submission form into a registered publication in four steps:
//!
//! 1. validate the form (no side effects)
//! 2. upload the paper to content-addressed storage
//! 3. register the publication with the registry
//! 4. for paid access, authorize spending and set the access price
//!
//! Steps 1 to 3 abort the flow on failure. A failure in step 4 leaves the
//! publication registered and is reported as free access with a warning.

pub mod error;
pub mod flow;
pub mod form;
pub mod report;
pub mod view;

pub use error::{PricingError, SubmissionError};
pub use flow::{settle_access, PublicationFlow};
pub use form::{AccessRequest, PaperFile, SubmissionForm, ValidatedSubmission, ValidationError};
pub use report::{AccessOutcome, StepOutcome, StepRecord, SubmissionReport, SubmissionStep};
pub use view::{list_publications, view_publication, PublicationView};

//! Reviewer matching
//!
//! Suggests reviewers for a submission by comparing its keywords against
//! each reviewer's expertise keywords with a fuzzy string similarity.

pub mod directory;
pub mod errors;
pub mod similarity;

pub use directory::{suggest_match_threshold, ReviewerDirectory, ReviewerProfile};
pub use errors::*;
pub use similarity::similarity_ratio;

#[cfg(test)]
mod tests;

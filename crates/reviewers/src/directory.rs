//! Reviewer directory and keyword matching.

use crate::errors::{Result, ReviewerError};
use crate::similarity::similarity_ratio;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A reviewer and the keywords describing their expertise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerProfile {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Similarity a keyword pair must reach to count as a match.
///
/// Short keywords need a closer match than long ones. Breadth is the mean of
/// the average keyword length on each side. Returns `None` when either list
/// is empty.
pub fn suggest_match_threshold(input: &[String], reviewer: &[String]) -> Option<f64> {
    let breadth = (mean_length(input)? + mean_length(reviewer)?) / 2.0;
    let threshold = if breadth < 5.0 {
        0.8
    } else if breadth < 10.0 {
        0.6
    } else {
        0.4
    };
    Some(threshold)
}

fn mean_length(keywords: &[String]) -> Option<f64> {
    if keywords.is_empty() {
        return None;
    }
    let total: usize = keywords.iter().map(|k| k.chars().count()).sum();
    Some(total as f64 / keywords.len() as f64)
}

/// Reviewers in registration order.
#[derive(Debug, Clone, Default)]
pub struct ReviewerDirectory {
    reviewers: Vec<ReviewerProfile>,
}

impl ReviewerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of `{"name": .., "keywords": [..]}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: Vec<ReviewerProfile> = serde_json::from_str(json)?;
        let mut directory = Self::new();
        for profile in profiles {
            directory.add_reviewer(profile.name, profile.keywords)?;
        }
        Ok(directory)
    }

    /// Register `name`, or replace the keywords of an existing reviewer
    /// without changing their position.
    pub fn add_reviewer(&mut self, name: impl Into<String>, keywords: Vec<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReviewerError::EmptyName);
        }

        match self.reviewers.iter_mut().find(|r| r.name == name) {
            Some(existing) => existing.keywords = keywords,
            None => self.reviewers.push(ReviewerProfile { name, keywords }),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ReviewerProfile> {
        self.reviewers.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }

    pub fn reviewers(&self) -> &[ReviewerProfile] {
        &self.reviewers
    }

    /// Names of reviewers with at least one keyword similar to one of
    /// `input`, in registration order.
    pub fn find_matching_reviewers(&self, input: &[String]) -> Vec<&str> {
        self.reviewers
            .iter()
            .filter(|reviewer| matches(input, &reviewer.keywords))
            .map(|reviewer| reviewer.name.as_str())
            .collect()
    }
}

fn matches(input: &[String], keywords: &[String]) -> bool {
    let Some(threshold) = suggest_match_threshold(input, keywords) else {
        return false;
    };

    input.iter().any(|wanted| {
        keywords.iter().any(|offered| {
            let ratio = similarity_ratio(wanted, offered);
            if ratio >= threshold {
                debug!(wanted, offered, ratio, threshold, "keyword match");
                true
            } else {
                false
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_threshold_bands() {
        assert_eq!(
            suggest_match_threshold(&words(&["ai"]), &words(&["AI", "ML"])),
            Some(0.8)
        );
        assert_eq!(
            suggest_match_threshold(&words(&["cancer"]), &words(&["medicine"])),
            Some(0.6)
        );
        assert_eq!(
            suggest_match_threshold(
                &words(&["neural network"]),
                &words(&["machine learning"])
            ),
            Some(0.4)
        );
        assert_eq!(suggest_match_threshold(&[], &words(&["AI"])), None);
    }

    #[test]
    fn test_re_adding_replaces_in_place() {
        let mut directory = ReviewerDirectory::new();
        directory.add_reviewer("a", words(&["x"])).unwrap();
        directory.add_reviewer("b", words(&["y"])).unwrap();
        directory.add_reviewer("a", words(&["z"])).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.reviewers()[0].name, "a");
        assert_eq!(directory.get("a").unwrap().keywords, words(&["z"]));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut directory = ReviewerDirectory::new();
        assert!(matches!(
            directory.add_reviewer(" ", words(&["x"])),
            Err(ReviewerError::EmptyName)
        ));
    }

    #[test]
    fn test_empty_lists_never_match() {
        let mut directory = ReviewerDirectory::new();
        directory.add_reviewer("nobody", vec![]).unwrap();
        directory.add_reviewer("someone", words(&["AI"])).unwrap();

        assert!(directory.find_matching_reviewers(&words(&["AI"])) == vec!["someone"]);
        assert!(directory.find_matching_reviewers(&[]).is_empty());
    }
}

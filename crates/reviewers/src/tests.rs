//! Matching against a realistic reviewer pool.

#[cfg(test)]
mod integration_tests {
    use crate::{ReviewerDirectory, ReviewerError};

    const POOL: &str = r#"[
        {"name": "Dr. Emily Carter", "keywords": ["medicine", "biology", "neurology", "oncology"]},
        {"name": "Michael Reynolds", "keywords": ["finance", "accounting", "investment", "business management"]},
        {"name": "Sarah Patel", "keywords": ["computer science", "software", "AI", "data science", "engineering"]},
        {"name": "Priya Ramesh", "keywords": ["AI", "machine learning", "data science", "software"]},
        {"name": "Dr. Leo Martin", "keywords": ["neurology", "neuroscience", "radiology", "medicine"]}
    ]"#;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pool_loads_in_order() {
        let directory = ReviewerDirectory::from_json(POOL).unwrap();
        assert_eq!(directory.len(), 5);
        assert_eq!(directory.reviewers()[0].name, "Dr. Emily Carter");
        assert_eq!(directory.reviewers()[4].name, "Dr. Leo Martin");
    }

    #[test]
    fn test_close_spelling_matches_software_reviewers() {
        let directory = ReviewerDirectory::from_json(POOL).unwrap();
        assert_eq!(
            directory.find_matching_reviewers(&words(&["softwares"])),
            vec!["Sarah Patel", "Priya Ramesh"]
        );
    }

    #[test]
    fn test_long_keywords_use_loose_threshold() {
        let directory = ReviewerDirectory::from_json(POOL).unwrap();
        assert_eq!(
            directory.find_matching_reviewers(&words(&["machine learning"])),
            vec![
                "Dr. Emily Carter",
                "Michael Reynolds",
                "Sarah Patel",
                "Priya Ramesh",
                "Dr. Leo Martin"
            ]
        );
    }

    #[test]
    fn test_mixed_query() {
        let directory = ReviewerDirectory::from_json(POOL).unwrap();
        assert_eq!(
            directory.find_matching_reviewers(&words(&["cancer", "neural network"])),
            vec!["Michael Reynolds"]
        );
    }

    #[test]
    fn test_malformed_pool() {
        assert!(matches!(
            ReviewerDirectory::from_json(r#"{"name": "x"}"#),
            Err(ReviewerError::InvalidDirectory(_))
        ));
    }
}

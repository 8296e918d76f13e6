use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewerError {
    #[error("Reviewer name must not be empty")]
    EmptyName,

    #[error("Invalid reviewer list: {0}")]
    InvalidDirectory(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReviewerError>;

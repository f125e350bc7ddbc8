//! Error types for Kinograph

use thiserror::Error;

/// Result type alias using Kinograph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Kinograph error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a transient per-call failure that the pipeline
    /// absorbs (as opposed to one that should abort the run).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::KnowledgeBase(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::KnowledgeBase("timeout".into()).is_recoverable());
        assert!(!Error::Config("missing endpoint".into()).is_recoverable());
        assert!(!Error::InvalidInput("empty title".into()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::Dataset("u.data not found".into());
        assert!(err.to_string().contains("u.data not found"));
    }
}

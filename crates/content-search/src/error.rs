use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The query cannot be interpreted by the advanced parser.
    ///
    /// Raised only for the bare wildcard-all query (`*`); callers fall back
    /// to a basic search on this condition.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SearchError {
    /// Returns true when the error asks the caller to retry with a basic search.
    pub fn is_malformed_query(&self) -> bool {
        matches!(self, Self::MalformedQuery(_))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

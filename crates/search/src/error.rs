use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to enumerate corpus under {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Search tool failed: {0}")]
    ExternalTool(String),

    #[error("Invalid limit '{0}': expected a positive integer")]
    InvalidLimit(String),

    #[error("Empty query")]
    EmptyQuery,
}

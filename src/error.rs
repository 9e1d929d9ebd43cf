use std::path::PathBuf;

use thiserror::Error;

/// Everything a load or a query can report back to the caller.
///
/// None of these leave the engine in a different state than before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("no trading data for date {date}")]
    NoMatch { date: String },

    #[error("no data loaded")]
    NotLoaded,
}

impl QueryError {
    /// Load failures are the only errors that can end a text session.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Parse { .. })
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Malformed input: bad document id, control characters, bad query word.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced document does not exist.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

impl SearchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SearchError::InvalidArgument(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        SearchError::OutOfRange(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SearchError::InvalidArgument(_))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SearchError::OutOfRange(_))
    }
}

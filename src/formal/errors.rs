use thiserror::Error;

/// Everything that can abort a render call. None of these are retried:
/// they are deterministic functions of the tree and the rule table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormalError {
    #[error("Malformed selector: {0}")]
    MalformedSelector(String),

    #[error("No rendering logic for node kind {0}")]
    MissingHandler(String),

    #[error("Index {index} not in lookup: {lookup}")]
    IndexOutOfRange { index: i64, lookup: String },

    #[error("Not yet supported: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid value {value:?} for option {key:?}")]
    InvalidOption { key: String, value: String },

    #[error("Value is undefined: {0}")]
    UndefinedValue(String),
}

pub type FormalResult<T> = Result<T, FormalError>;

impl FormalError {
    pub fn invalid_option(key: &str, value: impl ToString) -> Self {
        FormalError::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

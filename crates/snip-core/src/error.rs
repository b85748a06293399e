use thiserror::Error;

/// Errors related to the core types of the shortener.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short key: {0}")]
    InvalidShortKey(String),
}

/// Outcomes of a [`MappingStore`](crate::store::MappingStore) operation other than success.
///
/// `KeyExists` and `NotFound` are expected outcomes of the store contract;
/// the remaining variants mean the operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("key already exists: {0}")]
    KeyExists(String),
    #[error("url mapping not found: {0}")]
    NotFound(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortenerError {
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),
    #[error("no free short key after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

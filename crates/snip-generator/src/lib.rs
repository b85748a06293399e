//! Short key generation.

pub mod base62;
pub mod random;

pub use base62::Base62Generator;
pub use random::{OsRandom, RandomSource, RandomnessError};

use snip_core::{ShortKey, ShortenerError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

impl From<GeneratorError> for ShortenerError {
    fn from(value: GeneratorError) -> Self {
        match value {
            GeneratorError::RandomnessUnavailable(message) => {
                ShortenerError::RandomnessUnavailable(message)
            }
        }
    }
}

/// Trait for generating candidate short keys.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness is settled by the store's conditional insert.
pub trait Generator: Send + Sync + 'static {
    /// Generates a new candidate key.
    fn generate(&self) -> Result<ShortKey, GeneratorError>;

    /// Checks whether `candidate` has the syntax of a generated key.
    fn validate(&self, candidate: &str) -> bool {
        snip_core::is_valid(candidate)
    }
}

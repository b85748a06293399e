use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("random source failed: {0}")]
pub struct RandomnessError(pub String);

/// A source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomnessError>;
}

/// Random bytes from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), RandomnessError> {
        getrandom::fill(buf).map_err(|e| RandomnessError(e.to_string()))
    }
}

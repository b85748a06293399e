//! Collision-retry state machine for the create path.
//!
//! ```text
//! Attempt(n) --ok--------------------------> Done(key)
//! Attempt(n) --KeyExists, n < max----------> Attempt(n + 1)
//! Attempt(n) --KeyExists, n == max---------> Exhausted
//! Attempt(n) --any other failure-----------> Failed(err)
//! ```

use snip_core::{ShortKey, ShortenerError, StoreError};

/// Default number of candidate keys tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateStep {
    /// About to generate and insert the `n`th candidate (1-based).
    Attempt(u32),
    Done(ShortKey),
    /// Every attempt collided with an existing key.
    Exhausted { attempts: u32, last_key: ShortKey },
    Failed(ShortenerError),
}

/// What happened to a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Stored(ShortKey),
    Collided(ShortKey),
    Error(ShortenerError),
}

impl AttemptOutcome {
    /// Classifies the result of inserting `key`.
    pub fn from_store(key: ShortKey, result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => AttemptOutcome::Stored(key),
            Err(StoreError::KeyExists(_)) => AttemptOutcome::Collided(key),
            Err(other) => AttemptOutcome::Error(other.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// A policy allowing `max_attempts` candidates; at least one is always tried.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Transition out of `Attempt(attempt)` given that attempt's outcome.
    pub fn advance(&self, attempt: u32, outcome: AttemptOutcome) -> CreateStep {
        match outcome {
            AttemptOutcome::Stored(key) => CreateStep::Done(key),
            AttemptOutcome::Collided(key) if attempt >= self.max_attempts => CreateStep::Exhausted {
                attempts: attempt,
                last_key: key,
            },
            AttemptOutcome::Collided(_) => CreateStep::Attempt(attempt + 1),
            AttemptOutcome::Error(err) => CreateStep::Failed(err),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ShortKey {
        ShortKey::parse(s).unwrap()
    }

    #[test]
    fn success_finishes() {
        let policy = RetryPolicy::default();
        let step = policy.advance(1, AttemptOutcome::Stored(key("aaaaaaaa")));
        assert_eq!(step, CreateStep::Done(key("aaaaaaaa")));
    }

    #[test]
    fn collision_retries_until_the_last_attempt() {
        let policy = RetryPolicy::default();

        assert_eq!(
            policy.advance(1, AttemptOutcome::Collided(key("aaaaaaaa"))),
            CreateStep::Attempt(2)
        );
        assert_eq!(
            policy.advance(2, AttemptOutcome::Collided(key("bbbbbbbb"))),
            CreateStep::Attempt(3)
        );
        assert_eq!(
            policy.advance(3, AttemptOutcome::Collided(key("cccccccc"))),
            CreateStep::Exhausted {
                attempts: 3,
                last_key: key("cccccccc"),
            }
        );
    }

    #[test]
    fn other_failures_are_not_retried() {
        let policy = RetryPolicy::default();

        let step = policy.advance(
            1,
            AttemptOutcome::from_store(
                key("aaaaaaaa"),
                Err(StoreError::Unavailable("connection refused".into())),
            ),
        );
        assert_eq!(
            step,
            CreateStep::Failed(ShortenerError::Store(StoreError::Unavailable(
                "connection refused".into()
            )))
        );

        let step = policy.advance(
            1,
            AttemptOutcome::Error(ShortenerError::RandomnessUnavailable("gone".into())),
        );
        assert!(matches!(
            step,
            CreateStep::Failed(ShortenerError::RandomnessUnavailable(_))
        ));
    }

    #[test]
    fn key_exists_is_a_collision() {
        let outcome = AttemptOutcome::from_store(
            key("aaaaaaaa"),
            Err(StoreError::KeyExists("aaaaaaaa".into())),
        );
        assert!(matches!(outcome, AttemptOutcome::Collided(_)));
    }

    #[test]
    fn at_least_one_attempt() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        assert!(matches!(
            policy.advance(1, AttemptOutcome::Collided(key("aaaaaaaa"))),
            CreateStep::Exhausted { attempts: 1, .. }
        ));
    }
}

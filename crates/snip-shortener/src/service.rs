use crate::attempt::{AttemptOutcome, CreateStep, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use async_trait::async_trait;
use snip_core::{MappingStore, OpContext, ShortKey, Shortener, ShortenerError};
use snip_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Candidate keys tried before a create fails with `Exhausted`.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `MappingStore` and a `Generator` to handle:
/// - Short key generation
/// - Atomic reservation of the key via the store's conditional insert
/// - Bounded retry with a fresh key when the candidate is already taken
///
/// Only collisions are retried. Store failures and randomness failures end
/// the create immediately.
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    policy: RetryPolicy,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            policy: self.policy,
        }
    }
}

impl<S: MappingStore, G: Generator> ShortenerService<S, G> {
    /// Creates a new `ShortenerService` with the default retry policy.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_settings(store, generator, ShortenerSettings::default())
    }

    pub fn with_settings(store: S, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            policy: RetryPolicy::new(settings.max_attempts),
        }
    }

    /// Generates one candidate and tries to reserve it for `url`.
    async fn attempt(&self, ctx: &OpContext, url: &str) -> AttemptOutcome {
        let key = match self.generator.generate() {
            Ok(key) => key,
            Err(err) => return AttemptOutcome::Error(err.into()),
        };
        let result = self.store.create(ctx, &key, url).await;
        AttemptOutcome::from_store(key, result)
    }
}

#[async_trait]
impl<S: MappingStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, ctx: &OpContext, url: &str) -> Result<ShortKey, ShortenerError> {
        let mut step = CreateStep::Attempt(1);
        loop {
            step = match step {
                CreateStep::Attempt(attempt) => {
                    let outcome = self.attempt(ctx, url).await;
                    if let AttemptOutcome::Collided(key) = &outcome {
                        warn!(key = %key, attempt, "Generated short key is already taken");
                    }
                    self.policy.advance(attempt, outcome)
                }
                CreateStep::Done(key) => {
                    debug!(key = %key, "Stored new mapping");
                    return Ok(key);
                }
                CreateStep::Exhausted { attempts, last_key } => {
                    error!(
                        attempts,
                        last_key = %last_key,
                        "Every generated short key collided"
                    );
                    return Err(ShortenerError::Exhausted { attempts });
                }
                CreateStep::Failed(err) => {
                    warn!(error = %err, "Failed to create mapping");
                    return Err(err);
                }
            };
        }
    }

    async fn resolve(&self, ctx: &OpContext, key: &ShortKey) -> Result<String, ShortenerError> {
        Ok(self.store.get(ctx, key).await?)
    }

    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<(), ShortenerError> {
        Ok(self.store.delete(ctx, key).await?)
    }
}

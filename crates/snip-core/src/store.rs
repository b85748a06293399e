use crate::context::OpContext;
use crate::error::StoreError;
use crate::shortkey::ShortKey;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Default time-to-live of a mapping: three hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// A key-value store holding `ShortKey -> URL` mappings with sliding expiry.
///
/// Implementations must provide the atomicity guarantees through the backend's
/// own primitives:
///
/// - of two concurrent [`create`](MappingStore::create) calls for the same key,
///   exactly one succeeds and the other gets [`StoreError::KeyExists`];
/// - of N concurrent [`delete`](MappingStore::delete) calls for the same live
///   key, exactly one succeeds and the others get [`StoreError::NotFound`].
///
/// An operation whose context has already expired must fail with
/// [`StoreError::Timeout`] without touching the backend.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Inserts a mapping only if `key` is currently absent.
    ///
    /// The entry gets the store's full TTL. Empty keys or urls are rejected
    /// with [`StoreError::InvalidArgument`] before reaching the backend.
    async fn create(&self, ctx: &OpContext, key: &ShortKey, url: &str) -> Result<()>;

    /// Returns the URL for `key` and resets its TTL to the full duration.
    ///
    /// A failed TTL refresh is logged and does not fail the read.
    async fn get(&self, ctx: &OpContext, key: &ShortKey) -> Result<String>;

    /// Removes the mapping. Returns [`StoreError::NotFound`] if it was absent
    /// or already expired.
    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<()>;

    /// Checks whether a live mapping exists, without refreshing its TTL.
    async fn exists(&self, ctx: &OpContext, key: &ShortKey) -> Result<bool>;
}

#[async_trait]
impl<S: MappingStore + ?Sized> MappingStore for Arc<S> {
    async fn create(&self, ctx: &OpContext, key: &ShortKey, url: &str) -> Result<()> {
        (**self).create(ctx, key, url).await
    }

    async fn get(&self, ctx: &OpContext, key: &ShortKey) -> Result<String> {
        (**self).get(ctx, key).await
    }

    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<()> {
        (**self).delete(ctx, key).await
    }

    async fn exists(&self, ctx: &OpContext, key: &ShortKey) -> Result<bool> {
        (**self).exists(ctx, key).await
    }
}

/// Rejects arguments no backend should ever see.
pub fn check_arguments(key: &ShortKey, url: Option<&str>) -> Result<()> {
    if key.as_str().is_empty() {
        return Err(StoreError::InvalidArgument(
            "key cannot be empty".to_string(),
        ));
    }
    if url.is_some_and(str::is_empty) {
        return Err(StoreError::InvalidArgument(
            "url cannot be empty".to_string(),
        ));
    }
    Ok(())
}

use crate::context::OpContext;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores `url` under a freshly generated short key and returns the key.
    async fn shorten(&self, ctx: &OpContext, url: &str) -> Result<ShortKey>;

    /// Resolves a short key to its URL, extending the mapping's lifetime.
    async fn resolve(&self, ctx: &OpContext, key: &ShortKey) -> Result<String>;

    /// Deletes the mapping for a short key.
    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<()>;
}

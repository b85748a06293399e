use snip_core::{OpContext, ShortKey, Shortener};
use std::sync::Arc;
use std::time::Duration;

/// Default deadline for a single store operation issued by a request.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: String,
    store_timeout: Duration,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url.into(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    /// A fresh context carrying the per-request store deadline.
    pub fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.store_timeout)
    }

    pub fn short_url(&self, key: &ShortKey) -> String {
        key.to_url(&self.base_url)
    }
}

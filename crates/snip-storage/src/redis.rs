use async_trait::async_trait;
use redis::AsyncCommands;
use snip_core::store::{check_arguments, Result};
use snip_core::{MappingStore, OpContext, ShortKey, StoreError, DEFAULT_TTL};
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

/// Settings shared by every [`RedisStore`] handle.
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    /// Lifetime of a mapping after creation or its latest read.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: Duration,
    /// Prefix prepended to every short key to form the Redis key.
    #[builder(default, setter(into))]
    pub key_prefix: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A Redis-backed implementation of [`MappingStore`].
///
/// Each mapping is a plain string entry whose value is the target URL and
/// whose expiry is kept by the Redis server. Every operation is a single
/// Redis command, so an operation abandoned at its deadline either happened
/// completely or not at all:
///
/// - create: `SET key url NX PX ttl`
/// - get: `GET key`, then a best-effort `PEXPIRE key ttl`
/// - delete: `DEL key`, where a removed count of zero means not found
/// - exists: `EXISTS key`
#[derive(Debug, Clone)]
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    settings: StoreSettings,
}

/// TTL in whole milliseconds; Redis rejects a zero expiry.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Settles a read whose value is already in hand. A failed refresh is
/// logged and the URL is still returned.
fn finish_read(key: &ShortKey, url: String, refreshed: Result<bool>) -> Result<String> {
    match refreshed {
        Ok(true) => trace!(key = %key, "Refreshed mapping TTL"),
        Ok(false) => debug!(key = %key, "Mapping expired before its TTL could be refreshed"),
        Err(e) => warn!(key = %key, error = %e, "Failed to refresh mapping TTL"),
    }
    Ok(url)
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        StoreError::Timeout(message)
    } else {
        StoreError::Unavailable(message)
    }
}

impl RedisStore {
    /// Creates a store over an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection, settings: StoreSettings) -> Self {
        Self { conn, settings }
    }

    /// Opens a connection to `redis_url` and checks it with a `PING`.
    ///
    /// The URL may carry a password and database index, e.g.
    /// `redis://:secret@localhost:6379/2`.
    pub async fn connect(redis_url: &str, settings: StoreSettings) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("failed to create Redis client", e))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| map_redis_error("Redis PING failed", e))?;

        info!(ttl_secs = settings.ttl.as_secs(), "Connected to Redis");
        Ok(Self::new(conn, settings))
    }

    /// Generates the Redis key for a short key.
    fn storage_key(&self, key: &ShortKey) -> String {
        format!("{}{}", self.settings.key_prefix, key.as_str())
    }

    fn ttl_millis(&self) -> u64 {
        ttl_millis(self.settings.ttl)
    }
}

#[async_trait]
impl MappingStore for RedisStore {
    async fn create(&self, ctx: &OpContext, key: &ShortKey, url: &str) -> Result<()> {
        check_arguments(key, Some(url))?;
        let storage_key = self.storage_key(key);
        trace!(key = %key, "Creating mapping in Redis");

        let mut conn = self.conn.clone();
        let reply: Option<String> = ctx
            .run("create", async {
                redis::cmd("SET")
                    .arg(&storage_key)
                    .arg(url)
                    .arg("NX")
                    .arg("PX")
                    .arg(self.ttl_millis())
                    .query_async::<Option<String>>(&mut conn)
                    .await
                    .map_err(|e| map_redis_error("failed to create mapping in Redis", e))
            })
            .await?;

        match reply {
            Some(_) => {
                debug!(key = %key, "Created mapping in Redis");
                Ok(())
            }
            None => Err(StoreError::KeyExists(key.to_string())),
        }
    }

    async fn get(&self, ctx: &OpContext, key: &ShortKey) -> Result<String> {
        check_arguments(key, None)?;
        let storage_key = self.storage_key(key);
        trace!(key = %key, "Fetching mapping from Redis");

        let mut conn = self.conn.clone();
        let url: Option<String> = ctx
            .run("get", async {
                conn.get::<_, Option<String>>(&storage_key)
                    .await
                    .map_err(|e| map_redis_error("failed to fetch mapping from Redis", e))
            })
            .await?;

        let Some(url) = url else {
            trace!(key = %key, "Mapping not found in Redis");
            return Err(StoreError::NotFound(key.to_string()));
        };

        let ttl_millis = i64::try_from(self.ttl_millis()).unwrap_or(i64::MAX);
        let refreshed = ctx
            .run("refresh ttl", async {
                conn.pexpire::<_, bool>(&storage_key, ttl_millis)
                    .await
                    .map_err(|e| map_redis_error("failed to refresh mapping TTL", e))
            })
            .await;

        finish_read(key, url, refreshed)
    }

    async fn delete(&self, ctx: &OpContext, key: &ShortKey) -> Result<()> {
        check_arguments(key, None)?;
        let storage_key = self.storage_key(key);
        trace!(key = %key, "Removing mapping from Redis");

        let mut conn = self.conn.clone();
        let removed: i64 = ctx
            .run("delete", async {
                conn.del::<_, i64>(&storage_key)
                    .await
                    .map_err(|e| map_redis_error("failed to delete mapping from Redis", e))
            })
            .await?;

        if removed == 0 {
            return Err(StoreError::NotFound(key.to_string()));
        }
        debug!(key = %key, "Removed mapping from Redis");
        Ok(())
    }

    async fn exists(&self, ctx: &OpContext, key: &ShortKey) -> Result<bool> {
        check_arguments(key, None)?;
        let storage_key = self.storage_key(key);

        let mut conn = self.conn.clone();
        ctx.run("exists", async {
            conn.exists::<_, bool>(&storage_key)
                .await
                .map_err(|e| map_redis_error("failed to check mapping in Redis", e))
        })
        .await
    }
}

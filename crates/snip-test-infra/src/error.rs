use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("failed to start container: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    #[error("invalid Redis URL: {0}")]
    RedisUrl(#[source] redis::RedisError),

    /// The container started but never accepted a connection.
    #[error("Redis refused connections after {attempts} attempts: {source}")]
    RedisNotReady {
        attempts: u32,
        #[source]
        source: redis::RedisError,
    },
}

pub type Result<T> = std::result::Result<T, TestInfraError>;

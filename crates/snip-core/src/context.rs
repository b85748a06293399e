use crate::error::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Per-operation context handed to every store call.
///
/// Carries the caller's deadline. Cancellation is the usual async one:
/// dropping the operation's future aborts it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpContext {
    deadline: Option<Instant>,
}

impl OpContext {
    /// A context without a deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Returns true once the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails with [`StoreError::Timeout`] if the deadline has already passed.
    ///
    /// Store implementations call this before starting any work so that an
    /// expired context never produces a side effect.
    pub fn check(&self, operation: &str) -> Result<(), StoreError> {
        if self.is_expired() {
            return Err(StoreError::Timeout(format!(
                "{operation}: deadline exceeded before start"
            )));
        }
        Ok(())
    }

    /// Drives `fut` to completion unless the deadline passes first.
    pub async fn run<F, T>(&self, operation: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        self.check(operation)?;
        match self.deadline {
            None => fut.await,
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| StoreError::Timeout(format!("{operation}: deadline exceeded")))?,
        }
    }
}

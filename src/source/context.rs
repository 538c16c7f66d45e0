//! Per-call execution context handed to the upstream.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::source::types::{SourceError, SourceResult};

/// Deadline and cancellation signal for a single upstream call.
///
/// Cheap to clone. Implementations of [`SourceClient`](crate::source::SourceClient)
/// should stop work once [`CallContext::done`] resolves.
#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Instant,
    token: CancellationToken,
    key: Option<String>,
}

impl CallContext {
    pub fn new(deadline: Instant, token: CancellationToken) -> Self {
        Self {
            deadline,
            token,
            key: None,
        }
    }

    /// Attach the caller's credential so the upstream can use it.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves with the reason once the context is cancelled or expires.
    pub async fn done(&self) -> SourceError {
        tokio::select! {
            _ = self.token.cancelled() => SourceError::Canceled,
            _ = tokio::time::sleep_until(self.deadline) => SourceError::DeadlineExceeded,
        }
    }

    /// Fail fast if the context is already finished.
    pub fn check(&self) -> SourceResult<()> {
        if self.token.is_cancelled() {
            Err(SourceError::Canceled)
        } else if Instant::now() >= self.deadline {
            Err(SourceError::DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}

//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline measured from wrapper entry
//! - Inherit cancellation from the inbound request
//! - Cancel the derived context on every exit path
//!
//! # Design Decisions
//! - Uses Tokio's timer and `tokio_util` cancellation tokens
//! - Timeout and cancellation surface as distinct `SourceError` variants
//! - Exactly one attempt; there is no retry here

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::source::{CallContext, SourceError, SourceResult};

/// Ceiling applied to every upstream call unless configured otherwise.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

/// Run `call` under a context derived from `parent` and bounded by `ceiling`.
///
/// The derived token is a child of `parent`, so cancelling the inbound request
/// cancels the call. A drop guard cancels the derived token when this future
/// completes, errors, unwinds or is dropped.
pub async fn call_with_deadline<T, F, Fut>(
    parent: &CancellationToken,
    ceiling: Duration,
    call: F,
) -> SourceResult<T>
where
    F: FnOnce(CallContext) -> Fut,
    Fut: Future<Output = SourceResult<T>>,
{
    let token = parent.child_token();
    let _release = token.clone().drop_guard();
    let deadline = Instant::now() + ceiling;

    let upstream = call(CallContext::new(deadline, token.clone()));

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(SourceError::Canceled),
        _ = tokio::time::sleep_until(deadline) => Err(SourceError::DeadlineExceeded),
        result = upstream => result,
    }
}

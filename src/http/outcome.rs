//! Classification of upstream results.
//!
//! Rules are checked in order and the first match wins:
//!
//! 1. context cancelled or deadline passed → `UpstreamTimeout`
//! 2. upstream rejected the request → `UpstreamBadRequest` (message kept)
//! 3. upstream answer untrustworthy → `UpstreamBadResponse` (message kept)
//! 4. upstream rate limit hit → `UpstreamRateLimited`
//! 5. anything else → logged, then `UpstreamUnknown`
//!
//! Cancellation goes first because a cancelled call may also surface as a
//! transport failure.

use tracing::Level;

use crate::observability::{metrics, Logger};
use crate::source::{SourceError, SourceResult};

/// The single result category of one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    ClientError,
    UpstreamTimeout,
    UpstreamBadRequest(String),
    UpstreamBadResponse(String),
    UpstreamRateLimited,
    UpstreamUnknown,
}

impl<T> Outcome<T> {
    /// Classify the result of the upstream `operation`.
    pub fn classify(operation: &str, result: SourceResult<T>, logger: &dyn Logger) -> Self {
        let outcome = match result {
            Ok(payload) => Outcome::Success(payload),
            Err(SourceError::Canceled | SourceError::DeadlineExceeded) => Outcome::UpstreamTimeout,
            Err(SourceError::BadRequest(message)) => Outcome::UpstreamBadRequest(message),
            Err(SourceError::BadResponse(message)) => Outcome::UpstreamBadResponse(message),
            Err(SourceError::RateLimited) => Outcome::UpstreamRateLimited,
            Err(SourceError::Other(cause)) => {
                logger.log(
                    Level::ERROR,
                    &format!("{}: upstream error: {}", operation, error_chain(cause.as_ref())),
                );
                Outcome::UpstreamUnknown
            }
        };

        metrics::record_upstream_outcome(outcome.label());
        outcome
    }

    /// Stable name for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::ClientError => "client_error",
            Outcome::UpstreamTimeout => "upstream_timeout",
            Outcome::UpstreamBadRequest(_) => "upstream_bad_request",
            Outcome::UpstreamBadResponse(_) => "upstream_bad_response",
            Outcome::UpstreamRateLimited => "upstream_rate_limited",
            Outcome::UpstreamUnknown => "upstream_unknown",
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorded(Mutex<Vec<(Level, String)>>);

    impl Logger for Recorded {
        fn log(&self, level: Level, message: &str) {
            self.0.lock().unwrap().push((level, message.to_string()));
        }
    }

    fn classify(result: SourceResult<u8>, logger: &Recorded) -> Outcome<u8> {
        Outcome::classify("group_options", result, logger)
    }

    #[test]
    fn test_success() {
        let logger = Recorded::default();
        assert_eq!(classify(Ok(3), &logger), Outcome::Success(3));
        assert!(logger.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_context_errors_are_timeouts() {
        let logger = Recorded::default();
        assert_eq!(classify(Err(SourceError::Canceled), &logger), Outcome::UpstreamTimeout);
        assert_eq!(classify(Err(SourceError::DeadlineExceeded), &logger), Outcome::UpstreamTimeout);
        assert!(logger.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tagged_errors_keep_message() {
        let logger = Recorded::default();
        assert_eq!(
            classify(Err(SourceError::BadRequest("Группа не найдена".into())), &logger),
            Outcome::UpstreamBadRequest("Группа не найдена".into())
        );
        assert_eq!(
            classify(Err(SourceError::BadResponse("bad html".into())), &logger),
            Outcome::UpstreamBadResponse("bad html".into())
        );
        assert_eq!(classify(Err(SourceError::RateLimited), &logger), Outcome::UpstreamRateLimited);
        assert!(logger.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_is_logged_at_error() {
        let logger = Recorded::default();
        let err = SourceError::other(std::io::Error::new(std::io::ErrorKind::Other, "socket closed"));
        assert_eq!(classify(Err(err), &logger), Outcome::UpstreamUnknown);

        let logged = logger.0.lock().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].0, Level::ERROR);
        assert!(logged[0].1.starts_with("group_options: upstream error: socket closed"));
    }
}

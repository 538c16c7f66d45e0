//! Upstream payload types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A selectable group or teacher as offered by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One lesson slot within a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lesson {
    /// Ordinal of the lesson within the day ("1", "2", ...).
    pub number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub room: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subgroup: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub teacher: String,
}

/// Lessons for a single calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySchedule {
    /// Day in `DD.MM.YYYY` form.
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub weekday: String,
    pub lessons: Vec<Lesson>,
}

/// A news entry from the announcements feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announce {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

/// Discriminant of a [`SourceError`], for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    Canceled,
    DeadlineExceeded,
    BadRequest,
    BadResponse,
    RateLimited,
    Other,
}

/// Errors the upstream source can report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The call context was cancelled before the upstream answered.
    #[error("upstream call canceled")]
    Canceled,

    /// The call context deadline passed before the upstream answered.
    #[error("upstream deadline exceeded")]
    DeadlineExceeded,

    /// The caller-supplied identifiers were rejected by the upstream.
    /// The message is user-facing.
    #[error("{0}")]
    BadRequest(String),

    /// The upstream answered with something that could not be trusted.
    /// The message is user-facing.
    #[error("{0}")]
    BadResponse(String),

    /// The upstream request-rate ceiling was hit.
    #[error("upstream rate limit exceeded")]
    RateLimited,

    /// Anything else. Never shown to clients.
    #[error("upstream error: {0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl SourceError {
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            SourceError::Canceled => SourceErrorKind::Canceled,
            SourceError::DeadlineExceeded => SourceErrorKind::DeadlineExceeded,
            SourceError::BadRequest(_) => SourceErrorKind::BadRequest,
            SourceError::BadResponse(_) => SourceErrorKind::BadResponse,
            SourceError::RateLimited => SourceErrorKind::RateLimited,
            SourceError::Other(_) => SourceErrorKind::Other,
        }
    }

    /// Wrap an arbitrary failure as an unclassified upstream error.
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        SourceError::Other(err.into())
    }

    /// True for the context's own cancellation or deadline signal.
    pub fn is_context_error(&self) -> bool {
        matches!(
            self.kind(),
            SourceErrorKind::Canceled | SourceErrorKind::DeadlineExceeded
        )
    }
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

//! Request handling and validation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Expose query parameters and the request cancellation token to handlers
//! - Validate per-endpoint parameters before any upstream call
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Repeated query parameters: first value wins, absent reads as empty
//! - The cancellation token is cancelled when the request is dropped, which is
//!   how a client disconnect reaches the upstream call

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue, Request},
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::convert::Infallible;
use thiserror::Error;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::source::DATE_FORMAT;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 for every request lacking an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Transport-independent view of an inbound request.
#[derive(Debug)]
pub struct InboundRequest {
    params: HashMap<String, String>,
    token: CancellationToken,
    _cancel_on_drop: DropGuard,
}

impl InboundRequest {
    /// Build from a raw (still percent-encoded) query string.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = HashMap::new();
        if let Some(query) = query {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                params
                    .entry(name.into_owned())
                    .or_insert_with(|| value.into_owned());
            }
        }

        let token = CancellationToken::new();
        Self {
            params,
            _cancel_on_drop: token.clone().drop_guard(),
            token,
        }
    }

    /// Value of the named parameter, empty when absent.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }

    /// Cancelled once this request is dropped.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl<S> FromRequestParts<S> for InboundRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

/// Why a request was rejected before reaching the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing key")]
    MissingKey,

    #[error("date '{0}' is not DD.MM.YYYY")]
    InvalidDate(String),

    #[error("neither group nor teacher given")]
    MissingTarget,

    #[error("page '{0}' is not an integer")]
    InvalidPage(String),
}

/// Whose schedule is requested.
///
/// When a request names both a group and a teacher, the group wins and the
/// teacher is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleTarget {
    Group(String),
    Teacher(String),
}

/// Validated parameters of `/schedule`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub key: String,
    pub date: NaiveDate,
    pub target: ScheduleTarget,
}

impl ScheduleQuery {
    /// Validate `request`; `today` stands in for an absent `date`.
    pub fn parse(request: &InboundRequest, today: NaiveDate) -> Result<Self, ValidationError> {
        let key = request.param("key");
        if key.is_empty() {
            return Err(ValidationError::MissingKey);
        }

        let date = match request.param("date") {
            "" => today,
            raw => parse_date(raw)?,
        };

        let target = match (request.param("group"), request.param("teacher")) {
            (group, _) if !group.is_empty() => ScheduleTarget::Group(group.to_string()),
            (_, teacher) if !teacher.is_empty() => ScheduleTarget::Teacher(teacher.to_string()),
            _ => return Err(ValidationError::MissingTarget),
        };

        Ok(Self {
            key: key.to_string(),
            date,
            target,
        })
    }
}

/// Strict `DD.MM.YYYY`: two-digit day and month, four-digit year.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    if raw.len() != 10 {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Validated parameters of `/announces`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncesQuery {
    pub page: i64,
}

impl AnnouncesQuery {
    pub fn parse(request: &InboundRequest) -> Result<Self, ValidationError> {
        let raw = request.param("page");
        raw.parse::<i64>()
            .map(|page| Self { page })
            .map_err(|_| ValidationError::InvalidPage(raw.to_string()))
    }
}

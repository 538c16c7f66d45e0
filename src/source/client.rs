//! HTTP client for an upstream schedule service.
//!
//! # Responsibilities
//! - Issue one GET per operation against the configured base URL
//! - Bound each exchange by the call context (deadline and cancellation)
//! - Translate HTTP statuses and decode failures into [`SourceError`]

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::schema::UpstreamConfig;
use crate::source::context::CallContext;
use crate::source::types::{Announce, DaySchedule, SelectOption, SourceError, SourceResult};
use crate::source::{SourceClient, DATE_FORMAT};

/// Header carrying the caller's key to the upstream.
pub const API_KEY_HEADER: &str = "x-api-key";

const BAD_RESPONSE_MESSAGE: &str = "Некорректный ответ от источника расписания";

/// [`SourceClient`] speaking JSON over HTTP.
#[derive(Clone)]
pub struct HttpSourceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSourceClient {
    /// Create a client for the upstream described by `config`.
    pub fn new(config: &UpstreamConfig) -> SourceResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(SourceError::other)?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::other(format!(
                "upstream base URL '{}' cannot be a base",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(SourceError::other)?;

        tracing::info!(base_url = %base_url, "Upstream source client initialized");

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url
    }

    async fn fetch<T>(&self, ctx: CallContext, path: &str, query: &[(&str, String)]) -> SourceResult<T>
    where
        T: DeserializeOwned,
    {
        ctx.check()?;

        let mut request = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .timeout(ctx.remaining());
        if let Some(key) = ctx.key() {
            request = request.header(API_KEY_HEADER, key);
        }

        let exchange = async move {
            let response = request.send().await.map_err(map_transport)?;
            let status = response.status();
            let body = response.bytes().await.map_err(map_transport)?;

            tracing::debug!(path = %path, status = %status, bytes = body.len(), "Upstream answered");

            decode(status, &body)
        };

        tokio::select! {
            reason = ctx.done() => Err(reason),
            result = exchange => result,
        }
    }
}

fn map_transport(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::DeadlineExceeded
    } else {
        SourceError::other(err)
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> SourceResult<T> {
    match status {
        s if s.is_success() => serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "Upstream payload did not decode");
            SourceError::BadResponse(BAD_RESPONSE_MESSAGE.to_string())
        }),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            Err(SourceError::BadRequest(error_text(status, body)))
        }
        StatusCode::TOO_MANY_REQUESTS => Err(SourceError::RateLimited),
        s => Err(SourceError::other(format!("upstream returned {}", s))),
    }
}

/// Pull a user-facing message out of an upstream error body.
fn error_text(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["Error", "error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("Bad Request").to_string()
    } else {
        text
    }
}

#[async_trait]
impl SourceClient for HttpSourceClient {
    async fn group_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>> {
        self.fetch(ctx, "groups", &[]).await
    }

    async fn teacher_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>> {
        self.fetch(ctx, "teachers", &[]).await
    }

    async fn schedule_by_group(
        &self,
        ctx: CallContext,
        group: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>> {
        let query = [
            ("group", group.to_string()),
            ("date", date.format(DATE_FORMAT).to_string()),
        ];
        self.fetch(ctx, "schedule/group", &query).await
    }

    async fn schedule_by_teacher(
        &self,
        ctx: CallContext,
        teacher: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>> {
        let query = [
            ("teacher", teacher.to_string()),
            ("date", date.format(DATE_FORMAT).to_string()),
        ];
        self.fetch(ctx, "schedule/teacher", &query).await
    }

    async fn announces(&self, ctx: CallContext, page: i64) -> SourceResult<Vec<Announce>> {
        self.fetch(ctx, "announces", &[("page", page.to_string())]).await
    }
}

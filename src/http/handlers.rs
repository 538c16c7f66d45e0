//! Endpoint handlers.
//!
//! Each handler validates its parameters, makes at most one bounded upstream
//! call and turns the classified [`Outcome`] into the response.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use crate::http::outcome::Outcome;
use crate::http::request::{
    AnnouncesQuery, InboundRequest, ScheduleQuery, ScheduleTarget, ValidationError,
};
use crate::observability::Logger;
use crate::resilience::call_with_deadline;
use crate::source::{CallContext, SourceClient, SourceResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn SourceClient>,
    pub logger: Arc<dyn Logger>,
    pub upstream_timeout: Duration,
}

impl AppState {
    pub fn new(
        source: Arc<dyn SourceClient>,
        logger: Arc<dyn Logger>,
        upstream_timeout: Duration,
    ) -> Self {
        Self {
            source,
            logger,
            upstream_timeout,
        }
    }

    /// Run one upstream call under the request's bounded context and classify it.
    async fn bounded<T, F, Fut>(
        &self,
        request: &InboundRequest,
        operation: &str,
        call: F,
    ) -> Outcome<T>
    where
        F: FnOnce(CallContext) -> Fut,
        Fut: Future<Output = SourceResult<T>>,
    {
        let result = call_with_deadline(request.token(), self.upstream_timeout, call).await;
        Outcome::classify(operation, result, self.logger.as_ref())
    }

    fn reject(&self, endpoint: &str, err: ValidationError) -> Response {
        self.logger
            .log(Level::DEBUG, &format!("{}: rejected request: {}", endpoint, err));
        Outcome::<()>::ClientError.into_response()
    }
}

pub async fn groups(State(state): State<AppState>, request: InboundRequest) -> Response {
    state
        .bounded(&request, "group_options", |ctx| state.source.group_options(ctx))
        .await
        .into_response()
}

pub async fn teachers(State(state): State<AppState>, request: InboundRequest) -> Response {
    state
        .bounded(&request, "teacher_options", |ctx| state.source.teacher_options(ctx))
        .await
        .into_response()
}

pub async fn schedule(State(state): State<AppState>, request: InboundRequest) -> Response {
    let query = match ScheduleQuery::parse(&request, Local::now().date_naive()) {
        Ok(query) => query,
        Err(err) => return state.reject("schedule", err),
    };

    let key = query.key.as_str();
    match &query.target {
        ScheduleTarget::Group(group) => state
            .bounded(&request, "schedule_by_group", |ctx| {
                state.source.schedule_by_group(ctx.with_key(key), group, query.date)
            })
            .await
            .into_response(),
        ScheduleTarget::Teacher(teacher) => state
            .bounded(&request, "schedule_by_teacher", |ctx| {
                state.source.schedule_by_teacher(ctx.with_key(key), teacher, query.date)
            })
            .await
            .into_response(),
    }
}

pub async fn announces(State(state): State<AppState>, request: InboundRequest) -> Response {
    let query = match AnnouncesQuery::parse(&request) {
        Ok(query) => query,
        Err(err) => return state.reject("announces", err),
    };

    state
        .bounded(&request, "announces", |ctx| state.source.announces(ctx, query.page))
        .await
        .into_response()
}

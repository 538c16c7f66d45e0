//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use tracing::Level;

use schedule_gateway::config::GatewayConfig;
use schedule_gateway::lifecycle::Shutdown;
use schedule_gateway::observability::Logger;
use schedule_gateway::source::{
    Announce, CallContext, DaySchedule, Lesson, SelectOption, SourceClient, SourceError,
    SourceResult,
};
use schedule_gateway::HttpServer;

/// How the stand-in upstream answers every call.
#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    /// Sleep far past any gateway deadline.
    Hang,
    /// Wait for the call context to finish and report why.
    HonorContext,
    BadRequest(String),
    BadResponse(String),
    RateLimited,
    Fail(String),
}

/// Call-counting stand-in for the upstream source.
pub struct StubSource {
    behavior: Behavior,
    pub group_calls: AtomicUsize,
    pub teacher_calls: AtomicUsize,
    pub group_schedule_calls: AtomicUsize,
    pub teacher_schedule_calls: AtomicUsize,
    pub announce_calls: AtomicUsize,
    pub last_ctx: Mutex<Option<CallContext>>,
    pub last_target: Mutex<Option<(String, NaiveDate)>>,
    pub last_page: Mutex<Option<i64>>,
}

impl StubSource {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            group_calls: AtomicUsize::new(0),
            teacher_calls: AtomicUsize::new(0),
            group_schedule_calls: AtomicUsize::new(0),
            teacher_schedule_calls: AtomicUsize::new(0),
            announce_calls: AtomicUsize::new(0),
            last_ctx: Mutex::new(None),
            last_target: Mutex::new(None),
            last_page: Mutex::new(None),
        })
    }

    pub fn total_calls(&self) -> usize {
        self.group_calls.load(Ordering::SeqCst)
            + self.teacher_calls.load(Ordering::SeqCst)
            + self.group_schedule_calls.load(Ordering::SeqCst)
            + self.teacher_schedule_calls.load(Ordering::SeqCst)
            + self.announce_calls.load(Ordering::SeqCst)
    }

    pub fn last_ctx(&self) -> Option<CallContext> {
        self.last_ctx.lock().unwrap().clone()
    }

    async fn respond<T>(&self, ctx: CallContext, payload: T) -> SourceResult<T> {
        *self.last_ctx.lock().unwrap() = Some(ctx.clone());
        match &self.behavior {
            Behavior::Succeed => Ok(payload),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(payload)
            }
            Behavior::HonorContext => Err(ctx.done().await),
            Behavior::BadRequest(message) => Err(SourceError::BadRequest(message.clone())),
            Behavior::BadResponse(message) => Err(SourceError::BadResponse(message.clone())),
            Behavior::RateLimited => Err(SourceError::RateLimited),
            Behavior::Fail(message) => Err(SourceError::other(message.clone())),
        }
    }
}

pub fn options() -> Vec<SelectOption> {
    vec![
        SelectOption {
            value: "1".into(),
            label: "ИС-21".into(),
        },
        SelectOption {
            value: "2".into(),
            label: "ПК-22".into(),
        },
    ]
}

pub fn week(owner: &str, date: NaiveDate) -> Vec<DaySchedule> {
    vec![DaySchedule {
        date: date.format("%d.%m.%Y").to_string(),
        weekday: "Понедельник".into(),
        lessons: vec![Lesson {
            number: "1".into(),
            time: "08:30-10:00".into(),
            name: "Математика".into(),
            room: "301".into(),
            group: owner.into(),
            ..Default::default()
        }],
    }]
}

pub fn announces(page: i64) -> Vec<Announce> {
    vec![Announce {
        title: format!("Новость со страницы {}", page),
        date: "01.09.2024".into(),
        ..Default::default()
    }]
}

#[async_trait]
impl SourceClient for StubSource {
    async fn group_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>> {
        self.group_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(ctx, options()).await
    }

    async fn teacher_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>> {
        self.teacher_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(ctx, options()).await
    }

    async fn schedule_by_group(
        &self,
        ctx: CallContext,
        group: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>> {
        self.group_schedule_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_target.lock().unwrap() = Some((group.to_string(), date));
        self.respond(ctx, week(group, date)).await
    }

    async fn schedule_by_teacher(
        &self,
        ctx: CallContext,
        teacher: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>> {
        self.teacher_schedule_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_target.lock().unwrap() = Some((teacher.to_string(), date));
        self.respond(ctx, week(teacher, date)).await
    }

    async fn announces(&self, ctx: CallContext, page: i64) -> SourceResult<Vec<Announce>> {
        self.announce_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_page.lock().unwrap() = Some(page);
        self.respond(ctx, announces(page)).await
    }
}

/// Logger that keeps every line for later assertions.
#[derive(Default)]
pub struct RecordingLogger {
    pub lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

/// In-process router over `source` with default config.
pub fn router(source: Arc<StubSource>, logger: Arc<RecordingLogger>) -> Router {
    router_with(GatewayConfig::default(), source, logger)
}

pub fn router_with(
    config: GatewayConfig,
    source: Arc<StubSource>,
    logger: Arc<RecordingLogger>,
) -> Router {
    HttpServer::with_logger(config, source, logger).router()
}

/// POST `uri` with an empty body and collect the response.
pub async fn post(router: Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
    send(router, "POST", uri).await
}

pub async fn send(
    router: Router,
    method: &str,
    uri: &str,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}

/// Start a gateway on an ephemeral port. Returns its address and the shutdown handle.
pub async fn start_gateway(
    config: GatewayConfig,
    source: Arc<dyn SourceClient>,
) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, source);
    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    (addr, shutdown, handle)
}

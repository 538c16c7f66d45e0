//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the process
//! - Provide the injectable [`Logger`] capability used by the gateway core
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and environment (`RUST_LOG` wins)
//! - The core never touches a global logger directly; it gets a `Logger`

use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Severity-plus-message sink handed to the gateway at construction.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// [`Logger`] that forwards to the process-wide tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "schedule_gateway::gateway", "{}", message),
            Level::WARN => tracing::warn!(target: "schedule_gateway::gateway", "{}", message),
            Level::INFO => tracing::info!(target: "schedule_gateway::gateway", "{}", message),
            Level::DEBUG => tracing::debug!(target: "schedule_gateway::gateway", "{}", message),
            _ => tracing::trace!(target: "schedule_gateway::gateway", "{}", message),
        }
    }
}

/// Shared default logger.
pub fn tracing_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}

/// Install the global subscriber. `default_filter` applies when `RUST_LOG` is unset.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway core and handlers produce:
//!     → logging.rs (structured log events, injected Logger)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (tracing fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every response (x-request-id)
//! - Metrics are cheap and disabled by default

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, tracing_logger, Logger, TracingLogger};

//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (derive bounded context, enforce deadline, propagate cancel)
//!     → http::outcome (classify whatever came back)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: one inbound request, one upstream call

pub mod timeouts;

pub use timeouts::{call_with_deadline, DEFAULT_UPSTREAM_TIMEOUT};

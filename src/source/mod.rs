//! Upstream schedule source.
//!
//! # Data Flow
//! ```text
//! handler
//!     → resilience::timeouts (derive bounded CallContext)
//!     → SourceClient operation (HttpSourceClient or any other impl)
//!     → SourceResult<payload>
//!     → http::outcome (classify)
//! ```
//!
//! # Design Decisions
//! - The gateway only knows the trait; fetching, caching and parsing live upstream
//! - Failures are a closed enum matched by kind
//! - Every operation receives its own deadline-bearing context

pub mod client;
pub mod context;
pub mod types;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use client::HttpSourceClient;
pub use context::CallContext;
pub use types::{
    Announce, DaySchedule, Lesson, SelectOption, SourceError, SourceErrorKind, SourceResult,
};

/// Date format used on the wire by both the gateway and the upstream.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Read-only schedule operations provided by the upstream.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// All study groups.
    async fn group_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>>;

    /// All teachers.
    async fn teacher_options(&self, ctx: CallContext) -> SourceResult<Vec<SelectOption>>;

    /// Week schedule containing `date` for a group.
    async fn schedule_by_group(
        &self,
        ctx: CallContext,
        group: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>>;

    /// Week schedule containing `date` for a teacher.
    async fn schedule_by_teacher(
        &self,
        ctx: CallContext,
        teacher: &str,
        date: NaiveDate,
    ) -> SourceResult<Vec<DaySchedule>>;

    /// One page of the announcements feed.
    async fn announces(&self, ctx: CallContext, page: i64) -> SourceResult<Vec<Announce>>;
}

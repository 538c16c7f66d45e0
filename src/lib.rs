//! Academic schedule gateway library.
//!
//! Serves group, teacher, schedule and announcement queries over HTTP and
//! delegates the data itself to an upstream [`source::SourceClient`].

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod source;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use source::{HttpSourceClient, SourceClient};

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, prefix mount)
//!     → request.rs (request ID, query parameters, validation)
//!     → handlers.rs (one bounded upstream call per request)
//!     → outcome.rs (classify upstream result)
//!     → response.rs (status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod outcome;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::AppState;
pub use outcome::Outcome;
pub use request::{InboundRequest, ScheduleTarget, X_REQUEST_ID};
pub use response::Envelope;
pub use server::{build_router, HttpServer};

//! Client for the schedule gateway HTTP API.

mod client;

pub use client::{Envelope, GatewayClient};

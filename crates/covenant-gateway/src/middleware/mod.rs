//! Middleware stack: CORS, request tracing, per-IP rate limiting.

pub mod cors;
pub mod rate_limit;
pub mod tracing;

pub use cors::create_cors_layer;
pub use rate_limit::{cleanup_task, RateLimitLayer, RateLimitState};
pub use tracing::TracingLayer;

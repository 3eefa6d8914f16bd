// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! # Covenant Gateway - HTTP surface
//!
//! External interface of the covenant service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     GATEWAY                              │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────────────────────────────┐        │
//! │  │           Middleware Stack                   │        │
//! │  │        CORS → Tracing → RateLimit            │        │
//! │  └──────────────────┬───────────────────────────┘        │
//! │                     │                                    │
//! │   ┌─────────────────┼─────────────────────┐              │
//! │   ▼                 ▼                     ▼              │
//! │  /user/*        /contract/*          /magic/spell/:name  │
//! │  (sig auth)     (dual-sig gate)      (resolver adapter)  │
//! └──────────────────────┬───────────────────────────────────┘
//!                        │
//!                 CovenantService (covenant-core)
//! ```
//!
//! Requests accept both the current camelCase field names and the legacy
//! snake_case forms; responses emit camelCase only. Every response is the
//! `{success, data?|error?}` envelope.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

// Re-exports for public API
pub use domain::config::{Environment, GatewayConfig, RateLimitConfig};
pub use domain::error::ApiError;
pub use service::GatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

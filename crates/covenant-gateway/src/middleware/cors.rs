//! CORS layer.
//!
//! Contracts are public-readable by uuid and callers authenticate with
//! signatures, not cookies, so the policy is origin-permissive with the
//! standard method/header set.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Build the gateway CORS layer.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

//! Route handlers.

pub mod contracts;
pub mod magic;
pub mod users;

use axum::response::IntoResponse;
use axum::Json;
use covenant_core::CovenantService;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CovenantService>,
}

/// Service liveness.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "covenant",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "timestamp": covenant_core::domain::time::epoch_millis(),
    }))
}

//! Gateway service: router construction and server lifecycle.

use crate::domain::config::GatewayConfig;
use crate::handlers::{self, AppState};
use crate::middleware::{cleanup_task, create_cors_layer, RateLimitLayer, TracingLayer};
use axum::routing::{get, post, put};
use axum::Router;
use covenant_core::CovenantService;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tower::ServiceBuilder;
use tracing::info;

/// HTTP server wrapping the contract service.
pub struct GatewayService {
    config: GatewayConfig,
    state: AppState,
    shutdown_tx: Option<oneshot::Sender<()>>,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl GatewayService {
    /// Wire the gateway to the core service.
    pub fn new(config: GatewayConfig, service: Arc<CovenantService>) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        Self {
            config,
            state: AppState { service },
            shutdown_tx: Some(shutdown_tx),
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// Take the shutdown trigger, for wiring to a signal handler.
    pub fn shutdown_trigger(&mut self) -> Option<oneshot::Sender<()>> {
        self.shutdown_tx.take()
    }

    /// Build the router with the full middleware stack.
    pub fn build_router(&self) -> Router {
        let rate_limit = RateLimitLayer::new(self.config.rate_limit.clone());

        // Stale-bucket sweep for the limiter.
        let limiter_state = rate_limit.state();
        tokio::spawn(async move {
            cleanup_task(
                limiter_state,
                Duration::from_secs(60),
                Duration::from_secs(300),
            )
            .await;
        });

        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer())
            .layer(TracingLayer::new())
            .layer(rate_limit);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/user/create", put(handlers::users::create_user))
            .route("/user/:uuid", get(handlers::users::get_user))
            .route("/contract", post(handlers::contracts::create_contract))
            .route(
                "/contract/:uuid",
                get(handlers::contracts::get_contract)
                    .put(handlers::contracts::update_contract)
                    .delete(handlers::contracts::delete_contract),
            )
            .route(
                "/contract/:uuid/progress",
                get(handlers::contracts::contract_progress),
            )
            .route(
                "/contract/:uuid/status",
                get(handlers::contracts::signature_status),
            )
            .route("/contract/:uuid/sign", put(handlers::contracts::sign_step))
            .route("/contracts", get(handlers::contracts::list_contracts))
            .route("/magic/spell/:name", post(handlers::magic::cast_spell))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Bind and serve until shutdown is requested or the listener fails.
    pub async fn start(&mut self) -> Result<(), std::io::Error> {
        let shutdown_rx = self.shutdown_rx.take();

        let addr = self.config.bind_addr();
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(addr = %addr, env = ?self.config.env, "gateway listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => std::future::pending::<()>().await,
            }
            info!("shutdown signal received");
        })
        .await
    }

    /// Trigger graceful shutdown.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

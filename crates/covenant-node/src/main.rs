//! # Covenant Node
//!
//! The main entry point for the covenant contract coordination service.
//!
//! Wiring, leaves first:
//!
//! ```text
//! KeyRegistry ─┐
//! FileStore   ─┼─▶ ReplicatedStore ─▶ CovenantService ─▶ GatewayService
//! CosClient   ─┘                          ▲
//! FileUserStore ───────────────────────────┘
//! ```
//!
//! Configuration comes from the environment: `PORT`, `REMOTE_URL`, `ENV`,
//! `DATA_DIR`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use covenant_core::ports::outbound::NullEventPublisher;
use covenant_core::{
    CosClient, CovenantService, FileContractStore, FileUserStore, KeyRegistry, ReplicatedStore,
};
use covenant_gateway::{GatewayConfig, GatewayService};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn build_service(config: &GatewayConfig) -> Result<Arc<CovenantService>> {
    let data_dir = Path::new(&config.data_dir);

    let local = Arc::new(FileContractStore::open(data_dir.join("contracts"))?);
    let users = Arc::new(FileUserStore::open(data_dir.join("users"))?);
    let keys = Arc::new(KeyRegistry::open(data_dir.join("keys"))?);
    let remote = Arc::new(CosClient::new(config.remote_url.clone())?);

    let store = Arc::new(ReplicatedStore::new(local, remote, keys));
    Ok(Arc::new(CovenantService::new(
        store,
        users,
        Arc::new(NullEventPublisher),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = GatewayConfig::from_env()?;
    info!(
        port = config.port,
        remote = %config.remote_url,
        data_dir = %config.data_dir,
        "starting covenant service"
    );

    let service = build_service(&config)?;
    let mut gateway = GatewayService::new(config, service);

    // Ctrl+C drives the gateway's graceful shutdown.
    let trigger = gateway.shutdown_trigger();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            if let Some(tx) = trigger {
                let _ = tx.send(());
            }
        }
    });

    gateway.start().await?;
    info!("shutdown complete");
    Ok(())
}

//! Shared test environment.
//!
//! Assembles the full service over a temp directory with the mock remote
//! store, plus the signing helpers every scenario needs. `reopen` rebuilds
//! the stores over the same directory to simulate a process restart with
//! cold caches.

use covenant_core::domain::time;
use covenant_core::ports::outbound::{MockRemoteStore, RecordingEventPublisher};
use covenant_core::service::auth::{AuthFields, AuthGate};
use covenant_core::{
    CovenantService, FileContractStore, FileUserStore, KeyRegistry, ReplicatedStore, SignStepInput,
};
use covenant_crypto::Keypair;
use std::sync::Arc;
use tempfile::TempDir;

/// A fully wired service over a temp data directory.
pub struct TestEnv {
    dir: TempDir,
    pub service: Arc<CovenantService>,
    pub remote: Arc<MockRemoteStore>,
    pub events: Arc<RecordingEventPublisher>,
}

impl TestEnv {
    /// Fresh environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let remote = Arc::new(MockRemoteStore::new());
        let events = Arc::new(RecordingEventPublisher::new());
        let service = Self::wire(&dir, &remote, &events);
        Self {
            dir,
            service,
            remote,
            events,
        }
    }

    fn wire(
        dir: &TempDir,
        remote: &Arc<MockRemoteStore>,
        events: &Arc<RecordingEventPublisher>,
    ) -> Arc<CovenantService> {
        let local =
            Arc::new(FileContractStore::open(dir.path().join("contracts")).expect("contracts dir"));
        let users = Arc::new(FileUserStore::open(dir.path().join("users")).expect("users dir"));
        let keys = Arc::new(KeyRegistry::open(dir.path().join("keys")).expect("keys dir"));
        let store = Arc::new(ReplicatedStore::new(
            local,
            Arc::clone(remote) as Arc<dyn covenant_core::ports::outbound::RemoteObjectStore>,
            keys,
        ));
        Arc::new(CovenantService::new(
            store,
            users,
            Arc::clone(events) as Arc<dyn covenant_core::ports::outbound::EventPublisher>,
        ))
    }

    /// Simulate a restart: rebuild every store over the same directory.
    /// The remote store and its records survive; all in-memory caches do
    /// not.
    pub fn reopen(&mut self) {
        self.service = Self::wire(&self.dir, &self.remote, &self.events);
    }

    /// Gate fields signed by `keypair` for an operation on `contract_uuid`
    /// (or none).
    pub fn auth(
        &self,
        keypair: &Keypair,
        user_uuid: &str,
        contract_uuid: Option<&str>,
    ) -> AuthFields {
        let timestamp = time::epoch_millis();
        let message = match contract_uuid {
            None => format!("{timestamp}{user_uuid}"),
            Some(c) => format!("{timestamp}{user_uuid}{c}"),
        };
        AuthFields {
            signature: keypair.sign(&message),
            timestamp,
            user_uuid: user_uuid.to_string(),
            pub_key: keypair.public_key_hex(),
        }
    }

    /// Step-signature input matching `auth`, signed by `keypair`.
    pub fn step_signature(
        &self,
        keypair: &Keypair,
        auth: &AuthFields,
        contract_uuid: &str,
        step_id: &str,
    ) -> SignStepInput {
        let message =
            AuthGate::step_message(&auth.timestamp, &auth.user_uuid, contract_uuid, step_id);
        SignStepInput {
            step_id: step_id.to_string(),
            step_signature: keypair.sign(&message),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

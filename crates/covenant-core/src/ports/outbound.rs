//! Outbound ports.
//!
//! Traits for the stores and sinks the core writes to, plus mock
//! implementations used across the test suites.

use crate::domain::contract::{Contract, ContractSummary};
use crate::domain::errors::{CovenantError, RemoteStoreError};
use crate::domain::user::User;
use async_trait::async_trait;
use covenant_crypto::Keypair;

/// Durable local contract persistence - outbound port.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Persist a full contract document.
    async fn save(&self, contract: &Contract) -> Result<(), CovenantError>;

    /// Load a contract by uuid. `ContractNotFound` on absence.
    async fn load(&self, uuid: &str) -> Result<Contract, CovenantError>;

    /// Summaries of every stored contract, newest update first.
    async fn list(&self) -> Result<Vec<ContractSummary>, CovenantError>;

    /// Remove a contract document. Removing an absent document is not an
    /// error.
    async fn delete(&self, uuid: &str) -> Result<(), CovenantError>;
}

/// Durable local user persistence - outbound port.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a user record.
    async fn save(&self, user: &User) -> Result<(), CovenantError>;

    /// Load a user by uuid. `UserNotFound` on absence.
    async fn load(&self, uuid: &str) -> Result<User, CovenantError>;
}

/// Remote content-addressed object store - outbound port.
///
/// Records are owned by exactly one public key; every call signs with the
/// keypair passed to it and no other. `hash` is the client-chosen content
/// address (the contract uuid).
#[async_trait]
pub trait RemoteObjectStore: Send + Sync {
    /// Create a record; returns the server-assigned record id.
    async fn create_record(
        &self,
        hash: &str,
        payload: &serde_json::Value,
        keypair: &Keypair,
    ) -> Result<String, RemoteStoreError>;

    /// Replace a record's payload.
    async fn update_record(
        &self,
        record_id: &str,
        hash: &str,
        payload: &serde_json::Value,
        keypair: &Keypair,
    ) -> Result<(), RemoteStoreError>;

    /// Fetch a record's payload.
    async fn fetch_record(
        &self,
        record_id: &str,
        hash: &str,
        keypair: &Keypair,
    ) -> Result<serde_json::Value, RemoteStoreError>;

    /// Delete a record.
    async fn delete_record(
        &self,
        record_id: &str,
        hash: &str,
        keypair: &Keypair,
    ) -> Result<(), RemoteStoreError>;
}

/// Step lifecycle events emitted by the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// Every participant has signed the step.
    StepCompleted {
        contract_uuid: String,
        step_id: String,
    },
    /// A completed step carried an effect descriptor.
    EffectTriggered {
        contract_uuid: String,
        step_id: String,
        spell: serde_json::Value,
    },
}

/// Sink for step events - outbound port.
///
/// The core only signals; effect execution is external.
pub trait EventPublisher: Send + Sync {
    /// Emit one event.
    fn publish(&self, event: StepEvent);
}

/// Publisher that logs and drops.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish(&self, event: StepEvent) {
        match event {
            StepEvent::StepCompleted {
                contract_uuid,
                step_id,
            } => {
                tracing::info!(contract = %contract_uuid, step = %step_id, "step completed");
            }
            StepEvent::EffectTriggered {
                contract_uuid,
                step_id,
                ..
            } => {
                tracing::info!(contract = %contract_uuid, step = %step_id, "effect triggered");
            }
        }
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// In-memory remote store with a failure toggle.
#[derive(Default)]
pub struct MockRemoteStore {
    records: parking_lot::Mutex<std::collections::HashMap<String, serde_json::Value>>,
    next_id: std::sync::atomic::AtomicU64,
    /// When true, every call reports `Unavailable`.
    pub unavailable: std::sync::atomic::AtomicBool,
}

impl MockRemoteStore {
    /// Fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the outage toggle.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable
            .store(down, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of live records.
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    fn check_up(&self) -> Result<(), RemoteStoreError> {
        if self.unavailable.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(RemoteStoreError::Unavailable("mock outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteObjectStore for MockRemoteStore {
    async fn create_record(
        &self,
        _hash: &str,
        payload: &serde_json::Value,
        _keypair: &Keypair,
    ) -> Result<String, RemoteStoreError> {
        self.check_up()?;
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let record_id = format!("record-{id}");
        self.records.lock().insert(record_id.clone(), payload.clone());
        Ok(record_id)
    }

    async fn update_record(
        &self,
        record_id: &str,
        _hash: &str,
        payload: &serde_json::Value,
        _keypair: &Keypair,
    ) -> Result<(), RemoteStoreError> {
        self.check_up()?;
        let mut records = self.records.lock();
        match records.get_mut(record_id) {
            Some(slot) => {
                *slot = payload.clone();
                Ok(())
            }
            None => Err(RemoteStoreError::NotFound(record_id.to_string())),
        }
    }

    async fn fetch_record(
        &self,
        record_id: &str,
        _hash: &str,
        _keypair: &Keypair,
    ) -> Result<serde_json::Value, RemoteStoreError> {
        self.check_up()?;
        self.records
            .lock()
            .get(record_id)
            .cloned()
            .ok_or_else(|| RemoteStoreError::NotFound(record_id.to_string()))
    }

    async fn delete_record(
        &self,
        record_id: &str,
        _hash: &str,
        _keypair: &Keypair,
    ) -> Result<(), RemoteStoreError> {
        self.check_up()?;
        match self.records.lock().remove(record_id) {
            Some(_) => Ok(()),
            None => Err(RemoteStoreError::NotFound(record_id.to_string())),
        }
    }
}

/// Publisher that records events for assertions.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: parking_lot::Mutex<Vec<StepEvent>>,
}

impl RecordingEventPublisher {
    /// Fresh empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<StepEvent> {
        self.events.lock().clone()
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish(&self, event: StepEvent) {
        self.events.lock().push(event);
    }
}

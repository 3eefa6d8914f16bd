//! Replicated contract store.
//!
//! Composes the key registry, the local document store, and the remote
//! object store. The local store is authoritative: every write lands there
//! last, and every remote failure degrades to local-only with a warning.
//! The remote copy is a replica that may lag or be missing entirely.

use crate::adapters::keyring::KeyRegistry;
use crate::domain::contract::{Contract, ContractSummary};
use crate::domain::errors::CovenantError;
use crate::ports::outbound::{ContractStore, RemoteObjectStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

/// Write-through local + remote store with remote-preferred reads.
pub struct ReplicatedStore {
    local: Arc<dyn ContractStore>,
    remote: Arc<dyn RemoteObjectStore>,
    keys: Arc<KeyRegistry>,
    locks: parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ReplicatedStore {
    /// Compose the three collaborators.
    pub fn new(
        local: Arc<dyn ContractStore>,
        remote: Arc<dyn RemoteObjectStore>,
        keys: Arc<KeyRegistry>,
    ) -> Self {
        Self {
            local,
            remote,
            keys,
            locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the per-contract write lock. Callers hold the guard across a
    /// whole read-modify-write; the store methods themselves do not lock.
    pub async fn lock_contract(&self, uuid: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(uuid.to_string()).or_default())
        };
        mutex.lock_owned().await
    }

    /// Key registry handle.
    pub fn keys(&self) -> &KeyRegistry {
        &self.keys
    }

    /// First write: mint and bind the contract's keypair, stamp the public
    /// key, attempt remote creation, then save locally.
    pub async fn create(&self, contract: &mut Contract) -> Result<(), CovenantError> {
        let keypair = self.keys.mint()?;
        self.keys.bind(&contract.uuid, &keypair.public_key_hex())?;
        contract.pub_key = Some(keypair.public_key_hex());

        let payload = serde_json::to_value(&*contract)?;
        match self
            .remote
            .create_record(&contract.uuid, &payload, &keypair)
            .await
        {
            Ok(record_id) => {
                debug!(contract = %contract.uuid, record = %record_id, "remote record created");
                contract.remote_id = Some(record_id);
            }
            Err(err) => {
                warn!(contract = %contract.uuid, error = %err, "remote create failed, keeping local only");
            }
        }

        self.local.save(contract).await
    }

    /// Subsequent write: replicate the full document, then save locally.
    ///
    /// A contract that never got a remote record (creation during an outage)
    /// is reconciled here with a fresh create attempt. A missing key binding
    /// is a data-integrity error and fails the write.
    pub async fn update(&self, contract: &mut Contract) -> Result<(), CovenantError> {
        let keypair = self.keys.keypair_for_contract(&contract.uuid)?;
        let payload = serde_json::to_value(&*contract)?;

        match &contract.remote_id {
            Some(record_id) => {
                if let Err(err) = self
                    .remote
                    .update_record(record_id, &contract.uuid, &payload, &keypair)
                    .await
                {
                    warn!(contract = %contract.uuid, error = %err, "remote update failed, keeping local only");
                }
            }
            None => match self
                .remote
                .create_record(&contract.uuid, &payload, &keypair)
                .await
            {
                Ok(record_id) => {
                    debug!(contract = %contract.uuid, record = %record_id, "remote record reconciled");
                    contract.remote_id = Some(record_id);
                }
                Err(err) => {
                    warn!(contract = %contract.uuid, error = %err, "remote reconcile failed, keeping local only");
                }
            },
        }

        self.local.save(contract).await
    }

    /// Remote-preferred read with local fallback.
    pub async fn read(&self, uuid: &str) -> Result<Contract, CovenantError> {
        let local = self.local.load(uuid).await?;

        let record_id = match &local.remote_id {
            Some(id) => id.clone(),
            None => return Ok(local),
        };
        let keypair = match self.keys.keypair_for_contract(uuid) {
            Ok(keypair) => keypair,
            Err(_) => return Ok(local),
        };

        match self.remote.fetch_record(&record_id, uuid, &keypair).await {
            Ok(payload) => match serde_json::from_value::<Contract>(payload) {
                Ok(remote) => Ok(remote),
                Err(err) => {
                    warn!(contract = %uuid, error = %err, "remote document malformed, using local");
                    Ok(local)
                }
            },
            Err(err) => {
                debug!(contract = %uuid, error = %err, "remote fetch failed, using local");
                Ok(local)
            }
        }
    }

    /// Remove the remote record (best effort) and the local document.
    pub async fn delete(&self, contract: &Contract) -> Result<(), CovenantError> {
        if let Some(record_id) = &contract.remote_id {
            match self.keys.keypair_for_contract(&contract.uuid) {
                Ok(keypair) => {
                    if let Err(err) = self
                        .remote
                        .delete_record(record_id, &contract.uuid, &keypair)
                        .await
                    {
                        warn!(contract = %contract.uuid, error = %err, "remote delete failed");
                    }
                }
                Err(err) => {
                    warn!(contract = %contract.uuid, error = %err, "no keypair for remote delete");
                }
            }
        }
        // Key material is retained; revocation is out of scope.
        self.local.delete(&contract.uuid).await
    }

    /// Summaries from the local store.
    pub async fn list(&self) -> Result<Vec<ContractSummary>, CovenantError> {
        self.local.list().await
    }

    /// Local document, bypassing the remote. Mutating operations start from
    /// this copy.
    pub async fn load_local(&self, uuid: &str) -> Result<Contract, CovenantError> {
        self.local.load(uuid).await
    }
}

//! Per-contract key registry.
//!
//! Every contract owns its own secp256k1 keypair; the remote object store
//! authenticates record ownership by public key, so per-contract keys make
//! cross-contract isolation fall out of ownership itself.
//!
//! Layout under the registry directory:
//!
//! ```text
//! keys/<publicKeyHex>.json            {"pubKey": "...", "privateKey": "..."}
//! keys/contract-pubkey-mapping.json   {"<contractUuid>": "<publicKeyHex>"}
//! ```
//!
//! Caches are write-through; a miss reads from disk. The working set is
//! bounded by active contracts, so nothing is ever evicted.

use crate::adapters::store::file::{read_json, write_json_atomic};
use crate::domain::errors::CovenantError;
use covenant_crypto::Keypair;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const MAPPING_FILE: &str = "contract-pubkey-mapping.json";

/// Persisted keypair form. The file is named by its own public key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKeypair {
    pub_key: String,
    private_key: String,
}

/// Registry of contract keypairs and the contract → key binding map.
pub struct KeyRegistry {
    dir: PathBuf,
    keys: RwLock<HashMap<String, StoredKeypair>>,
    bindings: RwLock<HashMap<String, String>>,
}

impl KeyRegistry {
    /// Open the registry, creating the directory and restoring the binding
    /// map from disk.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CovenantError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let bindings: HashMap<String, String> =
            read_json(&dir.join(MAPPING_FILE))?.unwrap_or_default();
        if !bindings.is_empty() {
            tracing::info!(bound = bindings.len(), "restored contract key bindings");
        }

        Ok(Self {
            dir,
            keys: RwLock::new(HashMap::new()),
            bindings: RwLock::new(bindings),
        })
    }

    fn key_path(&self, pub_key: &str) -> PathBuf {
        self.dir.join(format!("{pub_key}.json"))
    }

    /// Generate a new keypair, persist it under its public key, and cache it.
    pub fn mint(&self) -> Result<Keypair, CovenantError> {
        let keypair = Keypair::generate();
        let stored = StoredKeypair {
            pub_key: keypair.public_key_hex(),
            private_key: keypair.private_key_hex(),
        };
        write_json_atomic(&self.key_path(&stored.pub_key), &stored)?;
        self.keys.write().insert(stored.pub_key.clone(), stored);
        Ok(keypair)
    }

    /// Load a keypair by public key: cache first, then disk.
    pub fn load(&self, pub_key: &str) -> Result<Keypair, CovenantError> {
        if let Some(stored) = self.keys.read().get(pub_key) {
            return Keypair::from_private_hex(&stored.private_key).map_err(|_| {
                CovenantError::Store(format!("corrupt key material for {pub_key}"))
            });
        }

        let stored: StoredKeypair =
            read_json(&self.key_path(pub_key))?.ok_or_else(|| CovenantError::KeyNotFound {
                reference: pub_key.to_string(),
            })?;
        let keypair = Keypair::from_private_hex(&stored.private_key)
            .map_err(|_| CovenantError::Store(format!("corrupt key material for {pub_key}")))?;
        self.keys.write().insert(pub_key.to_string(), stored);
        Ok(keypair)
    }

    /// Bind a contract uuid to a public key: updates the in-memory map and
    /// rewrites the aggregate mapping document under one write lock.
    pub fn bind(&self, contract_uuid: &str, pub_key: &str) -> Result<(), CovenantError> {
        let mut bindings = self.bindings.write();
        bindings.insert(contract_uuid.to_string(), pub_key.to_string());
        write_json_atomic(&self.dir.join(MAPPING_FILE), &*bindings)
    }

    /// Public key bound to a contract, or `KeyNotFound`.
    pub fn lookup(&self, contract_uuid: &str) -> Result<String, CovenantError> {
        self.bindings
            .read()
            .get(contract_uuid)
            .cloned()
            .ok_or_else(|| CovenantError::KeyNotFound {
                reference: contract_uuid.to_string(),
            })
    }

    /// Convenience: the keypair a contract signs remote calls with.
    pub fn keypair_for_contract(&self, contract_uuid: &str) -> Result<Keypair, CovenantError> {
        let pub_key = self.lookup(contract_uuid)?;
        self.load(&pub_key)
    }

    /// Number of bound contracts.
    pub fn binding_count(&self) -> usize {
        self.bindings.read().len()
    }
}

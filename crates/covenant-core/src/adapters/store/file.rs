//! File-backed document stores.
//!
//! One JSON document per record, named by its identifier. Writes go to a
//! temp file in the same directory and land with an atomic rename, so a
//! reader racing a writer observes either the old or the new document,
//! never a torn one.

use crate::domain::contract::{Contract, ContractSummary};
use crate::domain::errors::CovenantError;
use crate::domain::user::User;
use crate::ports::outbound::{ContractStore, UserStore};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write `value` as pretty JSON via temp file + rename.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CovenantError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(value)?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&temp_path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    std::fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read and parse a JSON document. `Ok(None)` when the file is absent.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CovenantError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Reject identifiers that could escape the store directory.
fn checked_path(dir: &Path, id: &str) -> Result<PathBuf, CovenantError> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(CovenantError::Store(format!("invalid document id: {id}")));
    }
    Ok(dir.join(format!("{id}.json")))
}

/// Contract documents under a `contracts/` directory.
pub struct FileContractStore {
    dir: PathBuf,
}

impl FileContractStore {
    /// Open (and create) the store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CovenantError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl ContractStore for FileContractStore {
    async fn save(&self, contract: &Contract) -> Result<(), CovenantError> {
        let path = checked_path(&self.dir, &contract.uuid)?;
        write_json_atomic(&path, contract)
    }

    async fn load(&self, uuid: &str) -> Result<Contract, CovenantError> {
        let path = checked_path(&self.dir, uuid)?;
        read_json(&path)?.ok_or_else(|| CovenantError::ContractNotFound {
            uuid: uuid.to_string(),
        })
    }

    async fn list(&self) -> Result<Vec<ContractSummary>, CovenantError> {
        let mut summaries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_json::<Contract>(&path)? {
                Some(contract) => summaries.push(contract.summary()),
                None => continue,
            }
        }
        // Newest update first; updatedAt is epoch ms, compare numerically.
        summaries.sort_by_key(|s| {
            std::cmp::Reverse(s.updated_at.parse::<u128>().unwrap_or_default())
        });
        Ok(summaries)
    }

    async fn delete(&self, uuid: &str) -> Result<(), CovenantError> {
        let path = checked_path(&self.dir, uuid)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// User documents under a `users/` directory.
pub struct FileUserStore {
    dir: PathBuf,
}

impl FileUserStore {
    /// Open (and create) the store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CovenantError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn save(&self, user: &User) -> Result<(), CovenantError> {
        let path = checked_path(&self.dir, &user.uuid)?;
        write_json_atomic(&path, user)
    }

    async fn load(&self, uuid: &str) -> Result<User, CovenantError> {
        let path = checked_path(&self.dir, uuid)?;
        read_json(&path)?.ok_or_else(|| CovenantError::UserNotFound {
            uuid: uuid.to_string(),
        })
    }
}

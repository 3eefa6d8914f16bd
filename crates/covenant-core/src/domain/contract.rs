//! Contract entities.
//!
//! A contract coordinates an ordered list of steps among two or more
//! participant public keys. A step completes the moment every participant
//! has a signature recorded for it; completion is monotone and never
//! recomputed downward.
//!
//! Documents serialize in the current camelCase wire form. Legacy snake_case
//! field names are accepted on input via serde aliases.

use super::errors::CovenantError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A multi-party contract document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Unique identifier.
    pub uuid: String,
    /// Human title.
    pub title: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: String,
    /// Participant public keys, order preserved as participation order.
    pub participants: Vec<String>,
    /// Ordered steps.
    pub steps: Vec<ContractStep>,
    /// Public key that authored the contract. Has exclusive delete rights.
    pub creator: String,
    /// Epoch milliseconds, string encoded.
    #[serde(alias = "created_at")]
    pub created_at: String,
    /// Epoch milliseconds, string encoded. Refreshed on every mutation.
    #[serde(alias = "updated_at")]
    pub updated_at: String,
    /// Status tag. The core only ever sets `active`; the rest is opaque.
    #[serde(default = "default_status")]
    pub status: String,
    /// Opaque product association.
    #[serde(default, alias = "product_uuid", skip_serializing_if = "Option::is_none")]
    pub product_uuid: Option<String>,
    /// Opaque external-location association.
    #[serde(default, alias = "bdo_location", skip_serializing_if = "Option::is_none")]
    pub bdo_location: Option<String>,
    /// The contract's own public key, fixed at first persistence.
    #[serde(default, alias = "pub_key", skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
    /// Record id assigned by the remote object store, when replication
    /// succeeded at least once.
    #[serde(default, alias = "remote_id", skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

impl Contract {
    /// Find a step by id.
    pub fn find_step(&self, step_id: &str) -> Option<&ContractStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Whether `pub_key` may mutate this contract (creator or participant).
    pub fn allows_update_by(&self, pub_key: &str) -> bool {
        self.creator == pub_key || self.participants.iter().any(|p| p == pub_key)
    }

    /// Count of completed steps.
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    /// Derived progress view.
    pub fn progress(&self) -> ContractProgress {
        let total_steps = self.steps.len();
        let completed_steps = self.completed_steps();
        ContractProgress {
            total_steps,
            completed_steps,
            progress_percent: if total_steps > 0 {
                (completed_steps as f64 / total_steps as f64) * 100.0
            } else {
                0.0
            },
            participant_count: self.participants.len(),
            is_complete: completed_steps == total_steps,
        }
    }

    /// Per-step signing status for one participant.
    pub fn signature_status(&self, participant: &str) -> Vec<StepSignatureStatus> {
        self.steps
            .iter()
            .map(|step| {
                let record = step.signatures.get(participant).and_then(|s| s.as_ref());
                StepSignatureStatus {
                    step_id: step.id.clone(),
                    description: step.description.clone(),
                    has_signed: record.is_some(),
                    signature_timestamp: record.map(|r| r.timestamp.clone()),
                    is_completed: step.completed,
                }
            })
            .collect()
    }

    /// Summary view for listings.
    pub fn summary(&self) -> ContractSummary {
        ContractSummary {
            uuid: self.uuid.clone(),
            title: self.title.clone(),
            participants: self.participants.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
            step_count: self.steps.len(),
            completed_steps: self.completed_steps(),
            remote_id: self.remote_id.clone(),
            pub_key: self.pub_key.clone(),
        }
    }
}

/// One unit of a contract, complete when every participant has signed it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStep {
    /// Step identifier.
    pub id: String,
    /// What this step asserts or delivers.
    pub description: String,
    /// Opaque effect descriptor, emitted on completion. Never inspected.
    #[serde(default, alias = "magic_spell", skip_serializing_if = "Option::is_none")]
    pub magic_spell: Option<serde_json::Value>,
    /// 0-based position, dense, always equals the step's index.
    pub order: usize,
    /// One entry per participant public key; `None` until signed.
    pub signatures: BTreeMap<String, Option<SignatureRecord>>,
    /// Completion flag. Monotone: set once, never cleared.
    pub completed: bool,
    /// Set when `completed` flips to true.
    #[serde(default, alias = "completed_at", skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl ContractStep {
    /// Whether every participant slot holds a signature.
    pub fn is_fully_signed(&self) -> bool {
        !self.signatures.is_empty() && self.signatures.values().all(|s| s.is_some())
    }

    /// Install `record` in the participant's slot and recompute completion.
    ///
    /// Returns `true` when this signature completed the step. A completed
    /// step rejects further writes; an unknown participant key is a caller
    /// error (the slot set is fixed at the participant list).
    pub fn apply_signature(
        &mut self,
        participant: &str,
        record: SignatureRecord,
        now_ms: &str,
    ) -> Result<bool, CovenantError> {
        if self.completed {
            return Err(CovenantError::StepAlreadyComplete {
                step_id: self.id.clone(),
            });
        }
        match self.signatures.get_mut(participant) {
            Some(slot) => *slot = Some(record),
            None => {
                return Err(CovenantError::Forbidden(format!(
                    "{participant} has no signature slot on step {}",
                    self.id
                )))
            }
        }
        if self.is_fully_signed() {
            self.completed = true;
            self.completed_at = Some(now_ms.to_string());
            return Ok(true);
        }
        Ok(false)
    }
}

/// A recorded step signature.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    /// Hex signature bytes.
    pub signature: String,
    /// Timestamp used inside the signed message, epoch ms string.
    #[serde(deserialize_with = "super::time::timestamp_compat::deserialize")]
    pub timestamp: String,
    /// Signer's public key.
    #[serde(alias = "pub_key")]
    pub pub_key: String,
    /// The canonical message that was signed.
    pub message: String,
    /// Wall-clock time the record was installed, epoch ms string.
    #[serde(alias = "signed_at")]
    pub signed_at: String,
}

/// Raw step as supplied to the create operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    /// Caller-chosen id; assigned when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Step description.
    pub description: String,
    /// Optional effect descriptor.
    #[serde(default, alias = "magic_spell")]
    pub magic_spell: Option<serde_json::Value>,
}

/// Listing view of a contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSummary {
    pub uuid: String,
    pub title: String,
    pub participants: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub step_count: usize,
    pub completed_steps: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_key: Option<String>,
}

/// Result of a sign-step operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutcome {
    pub contract_uuid: String,
    pub step_id: String,
    pub step_completed: bool,
    pub magic_triggered: bool,
}

/// Derived completion counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractProgress {
    pub total_steps: usize,
    pub completed_steps: usize,
    pub progress_percent: f64,
    pub participant_count: usize,
    pub is_complete: bool,
}

/// One participant's signing state for one step.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSignatureStatus {
    pub step_id: String,
    pub description: String,
    pub has_signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_timestamp: Option<String>,
    pub is_completed: bool,
}

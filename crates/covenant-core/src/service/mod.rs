//! Contract service: the state machine behind every entry point.
//!
//! Operations follow one shape: gate the caller, take the per-contract
//! lock, load the authoritative local document, transition, validate,
//! persist through the replicated store. Reads skip the lock and prefer
//! the remote replica.

pub mod auth;

use crate::domain::contract::{
    Contract, ContractProgress, ContractStep, ContractSummary, SignOutcome, SignatureRecord,
    StepInput, StepSignatureStatus,
};
use crate::domain::errors::CovenantError;
use crate::domain::time;
use crate::domain::user::User;
use crate::domain::validation::validate_contract;
use crate::ports::outbound::{EventPublisher, StepEvent, UserStore};
use crate::ReplicatedStore;
use auth::{AuthFields, AuthGate};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Inputs to the create operation.
#[derive(Clone, Debug)]
pub struct CreateContractInput {
    pub title: String,
    pub description: String,
    pub participants: Vec<String>,
    pub steps: Vec<StepInput>,
    pub product_uuid: Option<String>,
    pub bdo_location: Option<String>,
}

/// Partial update. Only these four fields are mutable; anything else in a
/// request is silently ignored by the gateway before it gets here.
#[derive(Clone, Debug, Default)]
pub struct UpdateContractInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<ContractStep>>,
    pub status: Option<String>,
}

/// Inputs to the sign-step operation, beyond the gate fields.
#[derive(Clone, Debug)]
pub struct SignStepInput {
    pub step_id: String,
    /// Signature over `timestamp || userUUID || contractUUID || stepId`
    /// under the caller's key.
    pub step_signature: String,
}

/// The contract coordination service.
pub struct CovenantService {
    store: Arc<ReplicatedStore>,
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventPublisher>,
}

impl CovenantService {
    /// Wire the service to its stores and event sink.
    pub fn new(
        store: Arc<ReplicatedStore>,
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            store,
            users,
            events,
        }
    }

    /// Replicated store handle.
    pub fn store(&self) -> &ReplicatedStore {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Register a caller: verifies the signature over `timestamp || pubKey`
    /// and assigns a uuid.
    pub async fn create_user(
        &self,
        pub_key: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<User, CovenantError> {
        let message = AuthGate::user_create_message(timestamp, pub_key);
        if !covenant_crypto::verify(signature, &message, pub_key) {
            return Err(CovenantError::AuthFailed);
        }

        let now = time::epoch_millis();
        let user = User {
            uuid: Uuid::new_v4().to_string(),
            pub_key: pub_key.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.users.save(&user).await?;
        info!(user = %user.uuid, "user created");
        Ok(user)
    }

    /// Fetch a user record; the caller proves key ownership with a
    /// signature over `timestamp || uuid`.
    pub async fn get_user(
        &self,
        uuid: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<User, CovenantError> {
        let user = self.users.load(uuid).await?;
        let message = AuthGate::user_fetch_message(timestamp, uuid);
        if !covenant_crypto::verify(signature, &message, &user.pub_key) {
            return Err(CovenantError::AuthFailed);
        }
        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Contracts
    // -------------------------------------------------------------------------

    /// Create a contract. The caller becomes the creator; participants need
    /// not include them.
    pub async fn create_contract(
        &self,
        auth: &AuthFields,
        input: CreateContractInput,
    ) -> Result<Contract, CovenantError> {
        AuthGate::verify(auth, None)?;

        let now = time::epoch_millis();
        let uuid = Uuid::new_v4().to_string();

        let steps = input
            .steps
            .into_iter()
            .enumerate()
            .map(|(index, step)| {
                let mut signatures = BTreeMap::new();
                for participant in &input.participants {
                    signatures.insert(participant.clone(), None);
                }
                ContractStep {
                    id: step.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                    description: step.description,
                    magic_spell: step.magic_spell,
                    order: index,
                    signatures,
                    completed: false,
                    completed_at: None,
                }
            })
            .collect();

        let mut contract = Contract {
            uuid: uuid.clone(),
            title: input.title,
            description: input.description,
            participants: input.participants,
            steps,
            creator: auth.pub_key.clone(),
            created_at: now.clone(),
            updated_at: now,
            status: "active".to_string(),
            product_uuid: input.product_uuid,
            bdo_location: input.bdo_location,
            pub_key: None,
            remote_id: None,
        };
        validate_contract(&contract)?;

        let _guard = self.store.lock_contract(&uuid).await;
        self.store.create(&mut contract).await?;
        info!(contract = %contract.uuid, steps = contract.steps.len(), "contract created");
        Ok(contract)
    }

    /// Fetch a contract, remote-preferred.
    pub async fn get_contract(&self, uuid: &str) -> Result<Contract, CovenantError> {
        self.store.read(uuid).await
    }

    /// Summaries, optionally filtered to contracts a participant is on.
    pub async fn list_contracts(
        &self,
        participant: Option<&str>,
    ) -> Result<Vec<ContractSummary>, CovenantError> {
        let mut summaries = self.store.list().await?;
        if let Some(pub_key) = participant {
            summaries.retain(|s| s.participants.iter().any(|p| p == pub_key));
        }
        Ok(summaries)
    }

    /// Derived completion counters.
    pub async fn contract_progress(&self, uuid: &str) -> Result<ContractProgress, CovenantError> {
        Ok(self.get_contract(uuid).await?.progress())
    }

    /// Per-step signing status for one participant.
    pub async fn signature_status(
        &self,
        uuid: &str,
        participant: &str,
    ) -> Result<Vec<StepSignatureStatus>, CovenantError> {
        Ok(self.get_contract(uuid).await?.signature_status(participant))
    }

    /// Update the mutable fields. Creator or any participant may update;
    /// wholesale step replacement is the caller's responsibility and is
    /// re-validated, not reconciled.
    pub async fn update_contract(
        &self,
        uuid: &str,
        auth: &AuthFields,
        input: UpdateContractInput,
    ) -> Result<Contract, CovenantError> {
        AuthGate::verify(auth, Some(uuid))?;

        let _guard = self.store.lock_contract(uuid).await;
        let mut contract = self.store.load_local(uuid).await?;

        if !contract.allows_update_by(&auth.pub_key) {
            return Err(CovenantError::Forbidden(
                "only the creator or a participant may update".to_string(),
            ));
        }

        if let Some(title) = input.title {
            contract.title = title;
        }
        if let Some(description) = input.description {
            contract.description = description;
        }
        if let Some(status) = input.status {
            contract.status = status;
        }
        if let Some(mut steps) = input.steps {
            // Order is derived from position, whatever the caller sent.
            for (index, step) in steps.iter_mut().enumerate() {
                step.order = index;
            }
            contract.steps = steps;
        }
        contract.updated_at = time::epoch_millis();

        validate_contract(&contract)?;
        self.store.update(&mut contract).await?;
        info!(contract = %contract.uuid, "contract updated");
        Ok(contract)
    }

    /// Sign a step. Preconditions, in order: caller is a participant; the
    /// step exists; the step signature verifies; the step is not complete.
    pub async fn sign_step(
        &self,
        uuid: &str,
        auth: &AuthFields,
        input: SignStepInput,
    ) -> Result<SignOutcome, CovenantError> {
        AuthGate::verify(auth, Some(uuid))?;

        let _guard = self.store.lock_contract(uuid).await;
        let mut contract = self.store.load_local(uuid).await?;

        if !contract.participants.iter().any(|p| p == &auth.pub_key) {
            return Err(CovenantError::Forbidden(
                "signer is not a participant".to_string(),
            ));
        }
        let step_index = contract
            .steps
            .iter()
            .position(|s| s.id == input.step_id)
            .ok_or_else(|| CovenantError::StepNotFound {
                step_id: input.step_id.clone(),
            })?;

        let message = AuthGate::step_message(&auth.timestamp, &auth.user_uuid, uuid, &input.step_id);
        if !covenant_crypto::verify(&input.step_signature, &message, &auth.pub_key) {
            return Err(CovenantError::InvalidStepSignature);
        }

        let now = time::epoch_millis();
        let record = SignatureRecord {
            signature: input.step_signature,
            timestamp: auth.timestamp.clone(),
            pub_key: auth.pub_key.clone(),
            message,
            signed_at: now.clone(),
        };

        let step = &mut contract.steps[step_index];
        let step_completed = step.apply_signature(&auth.pub_key, record, &now)?;
        let magic_spell = step.magic_spell.clone();
        let magic_triggered = step_completed && magic_spell.is_some();

        if step_completed {
            self.events.publish(StepEvent::StepCompleted {
                contract_uuid: uuid.to_string(),
                step_id: input.step_id.clone(),
            });
            if let Some(spell) = magic_spell {
                self.events.publish(StepEvent::EffectTriggered {
                    contract_uuid: uuid.to_string(),
                    step_id: input.step_id.clone(),
                    spell,
                });
            }
        }

        contract.updated_at = now;
        self.store.update(&mut contract).await?;

        info!(
            contract = %uuid,
            step = %input.step_id,
            completed = step_completed,
            "step signed"
        );
        Ok(SignOutcome {
            contract_uuid: uuid.to_string(),
            step_id: input.step_id,
            step_completed,
            magic_triggered,
        })
    }

    /// Delete a contract. Creator only - participants may not.
    pub async fn delete_contract(
        &self,
        uuid: &str,
        auth: &AuthFields,
    ) -> Result<(), CovenantError> {
        AuthGate::verify(auth, Some(uuid))?;

        let _guard = self.store.lock_contract(uuid).await;
        let contract = self.store.load_local(uuid).await?;

        if contract.creator != auth.pub_key {
            return Err(CovenantError::Forbidden(
                "only the creator may delete".to_string(),
            ));
        }

        self.store.delete(&contract).await?;
        info!(contract = %uuid, "contract deleted");
        Ok(())
    }
}

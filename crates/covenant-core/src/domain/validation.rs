//! Contract shape validation.
//!
//! Applied before create and after any update. Checks run in a fixed order
//! and fail on the first violation found.

use super::contract::Contract;
use super::errors::CovenantError;
use std::collections::BTreeSet;

/// Validate a contract document.
///
/// Rules, in order:
/// 1. non-empty title
/// 2. at least two participants, all non-empty, no duplicates
/// 3. at least one step
/// 4. every step has a non-empty description
/// 5. every step's signature map has exactly the participant set as keys
/// 6. step order indices are dense and match position
pub fn validate_contract(contract: &Contract) -> Result<(), CovenantError> {
    if contract.title.trim().is_empty() {
        return Err(CovenantError::Validation("title must not be empty".into()));
    }

    if contract.participants.len() < 2 {
        return Err(CovenantError::Validation(
            "at least 2 participants required".into(),
        ));
    }
    let mut seen = BTreeSet::new();
    for participant in &contract.participants {
        if participant.trim().is_empty() {
            return Err(CovenantError::Validation(
                "participant public keys must not be empty".into(),
            ));
        }
        if !seen.insert(participant.as_str()) {
            return Err(CovenantError::Validation(format!(
                "duplicate participant: {participant}"
            )));
        }
    }

    if contract.steps.is_empty() {
        return Err(CovenantError::Validation("at least 1 step required".into()));
    }
    for step in &contract.steps {
        if step.description.trim().is_empty() {
            return Err(CovenantError::Validation(format!(
                "step {} has an empty description",
                step.id
            )));
        }
    }

    let participant_set: BTreeSet<&str> =
        contract.participants.iter().map(String::as_str).collect();
    for step in &contract.steps {
        let signer_set: BTreeSet<&str> = step.signatures.keys().map(String::as_str).collect();
        if signer_set != participant_set {
            return Err(CovenantError::Validation(format!(
                "step {} signature map does not match the participant list",
                step.id
            )));
        }
    }

    for (index, step) in contract.steps.iter().enumerate() {
        if step.order != index {
            return Err(CovenantError::Validation(format!(
                "step {} has order {} at position {index}",
                step.id, step.order
            )));
        }
    }

    Ok(())
}

//! Endpoint authentication gate.
//!
//! Every mutating request carries four fields: `signature`, `timestamp`
//! (epoch ms string), `userUUID`, and `pubKey`. The gate reconstructs the
//! canonical message - plain concatenation, no separator - and verifies the
//! signature under the supplied public key. It performs no authorization:
//! creator/participant checks depend on contract contents and belong to the
//! state machine.
//!
//! No timestamp freshness window is enforced (see DESIGN.md).

use crate::domain::errors::CovenantError;
use serde::Deserialize;

/// Authentication fields required on every gated request.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthFields {
    /// Endpoint-auth signature, hex.
    pub signature: String,
    /// Epoch milliseconds, string encoded, as signed. Legacy clients send a
    /// bare integer; both forms are accepted.
    #[serde(deserialize_with = "crate::domain::time::timestamp_compat::deserialize")]
    pub timestamp: String,
    /// Caller's externally-assigned uuid.
    #[serde(rename = "userUUID", alias = "userUuid", alias = "user_uuid")]
    pub user_uuid: String,
    /// Caller's public key.
    #[serde(rename = "pubKey", alias = "pub_key")]
    pub pub_key: String,
}

/// The dual-signature gate.
pub struct AuthGate;

impl AuthGate {
    /// Verify the endpoint-auth signature. The message is
    /// `timestamp || userUUID` for operations without a contract, else
    /// `timestamp || userUUID || contractUUID`.
    pub fn verify(auth: &AuthFields, contract_uuid: Option<&str>) -> Result<(), CovenantError> {
        let message = match contract_uuid {
            None => format!("{}{}", auth.timestamp, auth.user_uuid),
            Some(contract) => format!("{}{}{}", auth.timestamp, auth.user_uuid, contract),
        };
        if covenant_crypto::verify(&auth.signature, &message, &auth.pub_key) {
            Ok(())
        } else {
            tracing::debug!(user = %auth.user_uuid, "endpoint signature rejected");
            Err(CovenantError::AuthFailed)
        }
    }

    /// Canonical message for a user-create request.
    pub fn user_create_message(timestamp: &str, pub_key: &str) -> String {
        format!("{timestamp}{pub_key}")
    }

    /// Canonical message for a user-fetch request.
    pub fn user_fetch_message(timestamp: &str, user_uuid: &str) -> String {
        format!("{timestamp}{user_uuid}")
    }

    /// Canonical message a participant signs to sign a step.
    pub fn step_message(
        timestamp: &str,
        user_uuid: &str,
        contract_uuid: &str,
        step_id: &str,
    ) -> String {
        format!("{timestamp}{user_uuid}{contract_uuid}{step_id}")
    }
}

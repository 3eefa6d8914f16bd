//! Error types for contract coordination.
//!
//! `CovenantError` variants are the kinds surfaced to callers; each maps to
//! one wire status in the gateway. `RemoteStoreError` classifies remote
//! object-store failures; those are logged and absorbed by the replicated
//! store and never reach a client.

use thiserror::Error;

/// Errors surfaced by core operations.
#[derive(Debug, Clone, Error)]
pub enum CovenantError {
    /// Contract shape violates an invariant. First violation wins.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Endpoint-auth signature did not verify.
    #[error("authentication failed")]
    AuthFailed,

    /// Caller is authenticated but not authorized for this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No contract document under this uuid.
    #[error("contract not found: {uuid}")]
    ContractNotFound { uuid: String },

    /// Contract exists but carries no step with this id.
    #[error("step not found: {step_id}")]
    StepNotFound { step_id: String },

    /// No user record under this uuid.
    #[error("user not found: {uuid}")]
    UserNotFound { uuid: String },

    /// Sign attempt against a step that already completed.
    #[error("step already complete: {step_id}")]
    StepAlreadyComplete { step_id: String },

    /// Step signature did not verify against the canonical step message.
    #[error("invalid step signature")]
    InvalidStepSignature,

    /// A contract's bound key material is missing. Data-integrity error:
    /// never silently re-minted.
    #[error("key material not found for {reference}")]
    KeyNotFound { reference: String },

    /// Local filesystem I/O or serialization failure.
    #[error("store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for CovenantError {
    fn from(err: std::io::Error) -> Self {
        CovenantError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for CovenantError {
    fn from(err: serde_json::Error) -> Self {
        CovenantError::Store(err.to_string())
    }
}

/// Classified remote object-store failures. Recoverable by design: the
/// replicated store logs them and proceeds with the local copy.
#[derive(Debug, Clone, Error)]
pub enum RemoteStoreError {
    /// Transport-level failure: connect refused, timeout, 5xx.
    #[error("remote object store unavailable: {0}")]
    Unavailable(String),

    /// The remote rejected the contract keypair's signature.
    #[error("remote object store rejected authentication: {0}")]
    AuthFailed(String),

    /// The record id is unknown to the remote.
    #[error("remote record not found: {0}")]
    NotFound(String),
}

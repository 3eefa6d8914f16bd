//! Domain model: contracts, steps, signatures, users, validation, errors.

pub mod contract;
pub mod errors;
pub mod time;
pub mod user;
pub mod validation;

pub use contract::{
    Contract, ContractProgress, ContractStep, ContractSummary, SignOutcome, SignatureRecord,
    StepInput, StepSignatureStatus,
};
pub use errors::{CovenantError, RemoteStoreError};
pub use user::User;
pub use validation::validate_contract;

// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! # Covenant Core - Contract Coordination
//!
//! State machine, signature protocol, and replicated persistence for
//! multi-party contracts.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        COVENANT CORE                           │
//! ├────────────────────────────────────────────────────────────────┤
//! │   ┌──────────────┐       ┌─────────────────────────────┐       │
//! │   │  Auth Gate   │──────▶│     Contract Service        │       │
//! │   │ (dual sig)   │       │  validate / sign / complete │       │
//! │   └──────────────┘       └──────────────┬──────────────┘       │
//! │                                         │                      │
//! │                          ┌──────────────┴──────────────┐       │
//! │                          │      Replicated Store        │      │
//! │                          └──────┬───────────────┬──────┘       │
//! │                                 │               │              │
//! │                       ┌─────────┴─────┐  ┌──────┴──────────┐   │
//! │                       │  Local JSON   │  │ Remote object   │   │
//! │                       │  documents    │  │ store (per-     │   │
//! │                       │  (atomic)     │  │ contract keys)  │   │
//! │                       └───────────────┘  └─────────────────┘   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A step completes when every participant has attached a valid signature.
//! Every write lands in the local store (authoritative) and is replicated to
//! the remote object store under the contract's own keypair; remote failures
//! degrade to local-only, never to request failure.
//!
//! # Module Structure
//!
//! ```text
//! covenant-core/
//! ├── domain/      # Contract, Step, SignatureRecord, User, validation, errors
//! ├── ports/       # ContractStore, UserStore, RemoteObjectStore, EventPublisher
//! ├── adapters/    # file stores, key registry, remote client, replicated store
//! └── service/     # CovenantService + auth gate
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports for public API
pub use adapters::cos::CosClient;
pub use adapters::keyring::KeyRegistry;
pub use adapters::replicated::ReplicatedStore;
pub use adapters::store::{FileContractStore, FileUserStore};
pub use domain::contract::{
    Contract, ContractStep, ContractSummary, SignOutcome, SignatureRecord, StepInput,
};
pub use domain::errors::{CovenantError, RemoteStoreError};
pub use domain::user::User;
pub use service::auth::AuthGate;
pub use service::{CovenantService, CreateContractInput, SignStepInput, UpdateContractInput};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
